use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cardify::{Separator, SeparatorPreset, UserInputError};
use exporter::{
    CollectingNotifier, DocumentStore, ExportError, ExportOutcome, ExportStage, Exporter, FsStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

fn vault(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn exporter(dir: &TempDir) -> Exporter<FsStore, CollectingNotifier> {
    Exporter::new(
        FsStore::new(dir.path()),
        CollectingNotifier::new(),
        Separator::preset(SeparatorPreset::EmptyLine),
    )
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn export_creates_one_card_per_block() {
    let dir = vault(&[("notes/deck.md", "A\n\nB\n\nC")]);
    let ex = exporter(&dir);

    let report = ex.export_with_rng(Path::new("notes/deck.md"), &mut rng()).unwrap();

    assert_eq!(report.outcome, ExportOutcome::Exported);
    assert_eq!(report.anchors_added.len(), 3);
    assert_eq!(report.folder, Some(PathBuf::from("notes/deck")));
    assert_eq!(
        report.created,
        vec![
            PathBuf::from("notes/deck/0.md"),
            PathBuf::from("notes/deck/1.md"),
            PathBuf::from("notes/deck/2.md"),
        ]
    );

    let note = read(&dir, "notes/deck.md");
    for (i, anchor) in report.anchors_added.iter().enumerate() {
        assert!(note.contains(&format!("\n^{}", anchor)));
        assert_eq!(
            read(&dir, &format!("notes/deck/{}.md", i)),
            format!("![[deck.md#^{}]]", anchor)
        );
    }
    assert_eq!(
        ex.notifier().messages(),
        vec!["3 new files stored in notes/deck".to_string()]
    );
}

#[test]
fn front_matter_survives_write_back() {
    let dir = vault(&[("deck.md", "---\ntags: [cards]\n---\nCard one\n^abc123\n\nCard two")]);
    let ex = exporter(&dir);

    let report = ex.export_with_rng(Path::new("deck.md"), &mut rng()).unwrap();

    assert_eq!(report.anchors_added.len(), 1);
    let expected = format!(
        "---\ntags: [cards]\n---\nCard one\n^abc123\n\nCard two\n^{}",
        report.anchors_added[0]
    );
    assert_eq!(read(&dir, "deck.md"), expected);
    assert_eq!(read(&dir, "deck/0.md"), "![[deck.md#^abc123]]");
}

#[test]
fn comment_titles_name_the_cards() {
    let dir = vault(&[(
        "deck.md",
        "> %%COMMENT%%\n> My Title\nBody text\n\n> %%COMMENT%%\n> What? Why!\nSecond",
    )]);
    let report = exporter(&dir)
        .export_with_rng(Path::new("deck.md"), &mut rng())
        .unwrap();
    assert_eq!(
        report.created,
        vec![
            PathBuf::from("deck/0-My Title.md"),
            PathBuf::from("deck/1-What Why.md"),
        ]
    );
}

#[test]
fn rerun_skips_existing_cards() {
    let dir = vault(&[("deck.md", "A\n\nB")]);
    let ex = exporter(&dir);
    ex.export_with_rng(Path::new("deck.md"), &mut rng()).unwrap();
    let note = read(&dir, "deck.md");
    ex.notifier().take();

    let report = ex
        .export_with_rng(Path::new("deck.md"), &mut StdRng::seed_from_u64(9))
        .unwrap();

    assert!(report.created.is_empty());
    assert!(report.anchors_added.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(read(&dir, "deck.md"), note);

    let mut messages = ex.notifier().messages();
    messages.sort();
    assert_eq!(
        messages,
        vec![
            "deck/0.md already exists, skipped overwriting it.".to_string(),
            "deck/1.md already exists, skipped overwriting it.".to_string(),
        ]
    );
}

#[test]
fn empty_note_reports_no_content() {
    let dir = vault(&[("blank.md", "---\na: 1\n---\n\n\n   \n")]);
    let ex = exporter(&dir);

    let report = ex.export_with_rng(Path::new("blank.md"), &mut rng()).unwrap();

    assert_eq!(report.outcome, ExportOutcome::NoContent);
    assert!(!dir.path().join("blank").exists());
    assert_eq!(read(&dir, "blank.md"), "---\na: 1\n---\n\n\n   \n");
    assert_eq!(ex.notifier().messages(), vec!["No new content".to_string()]);
}

#[test]
fn single_block_note_exports_one_card() {
    let dir = vault(&[("one.md", "Only card\nno separators here")]);
    let report = exporter(&dir)
        .export_with_rng(Path::new("one.md"), &mut rng())
        .unwrap();
    assert_eq!(report.created, vec![PathBuf::from("one/0.md")]);
}

#[test]
fn missing_and_non_markdown_documents_are_rejected() {
    let dir = vault(&[("image.png", "not a note")]);
    let ex = exporter(&dir);

    let missing = ex.export(Path::new("nope.md")).unwrap_err();
    assert!(matches!(
        missing,
        ExportError::Input(UserInputError::DocumentMissing(_))
    ));

    let wrong = ex.export(Path::new("image.png")).unwrap_err();
    assert!(matches!(wrong, ExportError::Input(UserInputError::NotMarkdown(_))));
}

#[test]
fn count_ignores_header_and_empty_blocks() {
    let dir = vault(&[("deck.md", "---\nx: 1\n---\nA\n\n \n\n\nB\n\n%% draft %%\n\n")]);
    assert_eq!(exporter(&dir).count(Path::new("deck.md")).unwrap(), 3);
}

/// Wraps a store and fails document writes or file creation on request.
struct Flaky {
    inner: FsStore,
    fail_writes: bool,
    fail_creates: bool,
}

impl Flaky {
    fn new(dir: &TempDir, fail_writes: bool, fail_creates: bool) -> Self {
        Flaky {
            inner: FsStore::new(dir.path()),
            fail_writes,
            fail_creates,
        }
    }
}

impl DocumentStore for Flaky {
    fn read_document(&self, path: &Path) -> io::Result<String> {
        self.inner.read_document(path)
    }

    fn write_document(&self, path: &Path, text: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only vault"));
        }
        self.inner.write_document(path, text)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn create_file(&self, path: &Path, content: &str) -> io::Result<()> {
        if self.fail_creates {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "disk is read-only"));
        }
        self.inner.create_file(path, content)
    }

    fn create_folder(&self, path: &Path) -> io::Result<()> {
        self.inner.create_folder(path)
    }
}

#[test]
fn write_back_failure_aborts_before_creating_cards() {
    let dir = vault(&[("deck.md", "A\n\nB")]);
    let ex = Exporter::new(
        Flaky::new(&dir, true, false),
        CollectingNotifier::new(),
        Separator::default(),
    );

    let err = ex.export_with_rng(Path::new("deck.md"), &mut rng()).unwrap_err();

    assert_eq!(err.stage(), Some(ExportStage::WritingBack));
    assert!(err.to_string().contains("deck.md"), "{}", err);
    assert!(!dir.path().join("deck").exists());
    assert_eq!(read(&dir, "deck.md"), "A\n\nB");
}

#[test]
fn card_creation_failure_names_the_card() {
    let dir = vault(&[("deck.md", "A\n^a\n\nB\n^b")]);
    let ex = Exporter::new(
        Flaky::new(&dir, false, true),
        CollectingNotifier::new(),
        Separator::default(),
    );

    let err = ex.export_with_rng(Path::new("deck.md"), &mut rng()).unwrap_err();

    assert_eq!(err.stage(), Some(ExportStage::CreatingArtifacts));
    let message = err.to_string();
    assert!(message.contains("creating artifacts"), "{}", message);
    assert!(message.contains("deck/0.md"), "{}", message);
    assert!(message.contains("disk is read-only"), "{}", message);
    assert!(ex.notifier().messages().is_empty());
}

#[test]
fn titles_cannot_climb_out_of_the_card_folder() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("vault");
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("deck.md"),
        "> %%COMMENT%%\n> /../../../escaped\nBody\n\nSecond card",
    )
    .unwrap();
    let ex = Exporter::new(FsStore::new(&root), CollectingNotifier::new(), Separator::default());

    let report = ex.export_with_rng(Path::new("deck.md"), &mut rng()).unwrap();

    assert_eq!(report.rejected, vec![PathBuf::from("0-/../../../escaped.md")]);
    assert_eq!(report.created, vec![PathBuf::from("deck/1.md")]);
    assert!(!outer.path().join("escaped.md").exists());
    assert!(!root.join("escaped.md").exists());
    assert!(
        ex.notifier()
            .messages()
            .iter()
            .any(|m| m.contains("outside deck")),
        "{:?}",
        ex.notifier().messages()
    );
}

#[test]
fn exclusive_create_reports_existing_file() {
    let dir = vault(&[("taken.md", "x")]);
    let store = FsStore::new(dir.path());
    let err = store.create_file(Path::new("taken.md"), "y").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert_eq!(read(&dir, "taken.md"), "x");
}
