use std::io;
use std::path::{Component, Path, PathBuf};

use cardify::{LinkedBlock, Separator, UserInputError, count_blocks, linked_blocks, reconcile_body, split};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ExportError, ExportStage};
use crate::notify::Notifier;
use crate::store::DocumentStore;

const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Cards were materialized (possibly all skipped as already present).
    Exported,
    /// The note has no card content; nothing was written.
    NoContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub outcome: ExportOutcome,
    /// Anchors appended to the note during this run.
    pub anchors_added: Vec<String>,
    /// Folder holding the generated cards.
    pub folder: Option<PathBuf>,
    pub created: Vec<PathBuf>,
    /// Card paths that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
    /// Card file names that would resolve outside the card folder.
    pub rejected: Vec<PathBuf>,
}

impl ExportReport {
    fn no_content() -> Self {
        ExportReport {
            outcome: ExportOutcome::NoContent,
            anchors_added: Vec::new(),
            folder: None,
            created: Vec::new(),
            skipped: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

enum Artifact {
    Created(PathBuf),
    Skipped(PathBuf),
    /// A title that would place the card outside its folder.
    Rejected(PathBuf),
}

/// Splits a note into one embed file per card.
pub struct Exporter<S, N> {
    store: S,
    notifier: N,
    separator: Separator,
}

impl<S: DocumentStore, N: Notifier> Exporter<S, N> {
    pub fn new(store: S, notifier: N, separator: Separator) -> Self {
        Exporter {
            store,
            notifier,
            separator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn export(&self, document: &Path) -> Result<ExportReport, ExportError> {
        self.export_with_rng(document, &mut rand::rng())
    }

    /// Export with an explicit anchor source.
    pub fn export_with_rng<R: Rng + ?Sized>(
        &self,
        document: &Path,
        rng: &mut R,
    ) -> Result<ExportReport, ExportError> {
        let note = Note::resolve(&self.store, document)?;

        stage(ExportStage::Reading, document);
        let raw = self
            .store
            .read_document(document)
            .map_err(ExportError::io(ExportStage::Reading, document))?;
        let parsed = split(&raw);

        stage(ExportStage::Reconciling, document);
        let reconciled = reconcile_body(&parsed.body, &self.separator, rng)?;

        stage(ExportStage::WritingBack, document);
        if reconciled.changed() {
            self.store
                .write_document(document, &parsed.with_body(&reconciled.text))
                .map_err(ExportError::io(ExportStage::WritingBack, document))?;
            info!(
                document = %document.display(),
                added = reconciled.added.len(),
                "anchors written back"
            );
        }

        stage(ExportStage::Segmenting, document);
        let cards = linked_blocks(&reconciled.text, &self.separator, &note.name)?;
        if cards.is_empty() {
            self.notifier.notify("No new content");
            stage(ExportStage::Done, document);
            return Ok(ExportReport::no_content());
        }

        stage(ExportStage::CreatingArtifacts, document);
        if !self.store.exists(&note.folder) {
            self.store
                .create_folder(&note.folder)
                .map_err(ExportError::io(ExportStage::CreatingArtifacts, &note.folder))?;
        }

        let results: Vec<Result<Artifact, ExportError>> = cards
            .par_iter()
            .map(|card| self.create_artifact(&note.folder, card))
            .collect();

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        let mut rejected = Vec::new();
        for result in results {
            match result? {
                Artifact::Created(path) => created.push(path),
                Artifact::Skipped(path) => skipped.push(path),
                Artifact::Rejected(name) => rejected.push(name),
            }
        }
        created.sort();
        skipped.sort();
        rejected.sort();

        if !created.is_empty() {
            self.notifier.notify(&format!(
                "{} new files stored in {}",
                created.len(),
                note.folder.display()
            ));
        }
        stage(ExportStage::Done, document);

        Ok(ExportReport {
            outcome: ExportOutcome::Exported,
            anchors_added: reconciled.added,
            folder: Some(note.folder),
            created,
            skipped,
            rejected,
        })
    }

    /// Number of cards in the note, without touching it.
    pub fn count(&self, document: &Path) -> Result<usize, ExportError> {
        let raw = self
            .store
            .read_document(document)
            .map_err(ExportError::io(ExportStage::Reading, document))?;
        Ok(count_blocks(&split(&raw).body, &self.separator))
    }

    fn create_artifact(&self, folder: &Path, card: &LinkedBlock) -> Result<Artifact, ExportError> {
        let name = card.file_name();
        let relative = Path::new(&name);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            warn!(name = %name, folder = %folder.display(), "card path leaves its folder");
            self.notifier.notify(&format!(
                "{} would be written outside {}, skipped it.",
                name,
                folder.display()
            ));
            return Ok(Artifact::Rejected(relative.to_path_buf()));
        }
        let path = folder.join(relative);

        // Titles may contain `/`, which nests the card below the folder.
        if let Some(parent) = path.parent() {
            if parent != folder && !self.store.exists(parent) {
                self.store
                    .create_folder(parent)
                    .map_err(ExportError::io(ExportStage::CreatingArtifacts, parent))?;
            }
        }

        if self.store.exists(&path) {
            return Ok(self.skip(path));
        }
        match self.store.create_file(&path, &card.link) {
            Ok(()) => {
                info!(path = %path.display(), anchor = %card.anchor, "card created");
                Ok(Artifact::Created(path))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(self.skip(path)),
            Err(e) => Err(ExportError::io(ExportStage::CreatingArtifacts, path)(e)),
        }
    }

    fn skip(&self, path: PathBuf) -> Artifact {
        warn!(path = %path.display(), "card already exists");
        self.notifier.notify(&format!(
            "{} already exists, skipped overwriting it.",
            path.display()
        ));
        Artifact::Skipped(path)
    }
}

fn stage(stage: ExportStage, document: &Path) {
    debug!(stage = %stage, document = %document.display(), "export stage");
}

/// The note being exported and where its cards go.
struct Note {
    /// File name used in embeds, e.g. `deck.md`.
    name: String,
    /// `<dir>/<stem>` next to the note.
    folder: PathBuf,
}

impl Note {
    fn resolve<S: DocumentStore>(store: &S, document: &Path) -> Result<Note, UserInputError> {
        let shown = document.display().to_string();
        if !store.exists(document) {
            return Err(UserInputError::DocumentMissing(shown));
        }
        let is_markdown = document
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTE_EXTENSION));
        let (Some(name), Some(stem), true) = (document.file_name(), document.file_stem(), is_markdown)
        else {
            return Err(UserInputError::NotMarkdown(shown));
        };
        let folder = document
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(stem);
        Ok(Note {
            name: name.to_string_lossy().into_owned(),
            folder,
        })
    }
}
