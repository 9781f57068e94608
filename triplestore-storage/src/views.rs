// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! View Materializer
//!
//! A view is a directory of symbolic links into the partition directory:
//!
//! ```text
//! <store>/views/<label>_<localid>/<subject_hash>.ttl -> ../../triples/<subject_hash>.ttl
//! ```
//!
//! The directory is named after the anchor object (the object of the
//! trigger triple); each link points at the partition of a subject related
//! to that anchor. Links are added and removed one event at a time and both
//! operations are idempotent.

use crate::codec;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use triplestore_core::{EventKind, Graph, Result, Term, TripleStoreError};

/// Label used when the anchor has no `rdfs:label`. Existing stores name
/// such views `None_<localid>`.
pub const UNLABELED: &str = "None";

/// What a view event did on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Linked { view: String },
    AlreadyLinked { view: String },
    Unlinked { view: String },
    AlreadyAbsent { view: String },
}

pub struct ViewMaterializer {
    views_dir: PathBuf,
    /// Link target prefix from inside one view directory, e.g. `../../triples`.
    link_base: PathBuf,
}

impl ViewMaterializer {
    /// `views_path` and `triples_path` are relative to the store root.
    pub fn new(store_root: &Path, views_path: &str, triples_path: &str) -> Self {
        let depth = Path::new(views_path)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
            + 1;
        let mut link_base = PathBuf::new();
        for _ in 0..depth {
            link_base.push("..");
        }
        link_base.push(triples_path);

        Self {
            views_dir: store_root.join(views_path),
            link_base,
        }
    }

    pub fn views_dir(&self) -> &Path {
        &self.views_dir
    }

    /// `<label>_<localid>` with path separators neutralised.
    pub fn view_name(label: Option<&str>, anchor: &Term) -> String {
        let label = label.unwrap_or(UNLABELED);
        sanitize(&format!("{}_{}", label, anchor.local_id()))
    }

    pub fn view_dir(&self, view: &str) -> PathBuf {
        self.views_dir.join(view)
    }

    /// Apply one event for `subject` under the view of `anchor`.
    pub fn apply(
        &self,
        kind: EventKind,
        subject: &Term,
        anchor: &Term,
        anchor_label: Option<&str>,
    ) -> Result<ViewChange> {
        let view = Self::view_name(anchor_label, anchor);
        let dir = self.view_dir(&view);
        let file_name = codec::partition_file_name(subject);
        let link = dir.join(&file_name);

        match kind {
            EventKind::Insert => {
                fs::create_dir_all(&dir)?;
                let target = self.link_base.join(&file_name);
                match symlink_file(&target, &link) {
                    Ok(()) => {
                        debug!(view = %view, subject = %subject, "View link created");
                        Ok(ViewChange::Linked { view })
                    }
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        Ok(ViewChange::AlreadyLinked { view })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            EventKind::Delete => match fs::remove_file(&link) {
                Ok(()) => {
                    debug!(view = %view, subject = %subject, "View link removed");
                    Ok(ViewChange::Unlinked { view })
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Ok(ViewChange::AlreadyAbsent { view })
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Names of every view directory.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.views_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut views = Vec::new();
        for entry in fs::read_dir(&self.views_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                views.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        views.sort();
        Ok(views)
    }

    /// Union of the partitions a view links to.
    ///
    /// Dangling links are skipped; a link that resolves to a corrupt
    /// partition is an error.
    pub fn load(&self, view: &str) -> Result<Graph> {
        let dir = self.view_dir(view);
        if !is_plain_name(view) || !dir.is_dir() {
            return Err(TripleStoreError::ViewNotFound(view.to_string()));
        }

        let mut graph = Graph::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !codec::is_partition_file(&path) {
                continue;
            }
            if !path.exists() {
                warn!(view = %view, link = ?path, "Dangling view link");
                continue;
            }
            graph.merge(&codec::read_partition(&path)?);
        }
        Ok(graph)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

fn is_plain_name(view: &str) -> bool {
    let mut components = Path::new(view).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
