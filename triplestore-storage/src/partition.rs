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


//! Subject Partition Store
//!
//! One file per subject under the partition directory. Every mutation is a
//! read-modify-write of the whole file. Partition files are never deleted:
//! a subject whose last triple was removed keeps an empty file, which is
//! how "emptied" stays distinguishable from "never inserted".

use crate::codec;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use triplestore_core::{Graph, Result, Term, Triple};

pub struct SubjectPartitionStore {
    dir: PathBuf,
}

impl SubjectPartitionStore {
    /// Open (creating if needed) the partition directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, subject: &Term) -> PathBuf {
        self.dir.join(codec::partition_file_name(subject))
    }

    pub fn exists(&self, subject: &Term) -> bool {
        self.path_for(subject).is_file()
    }

    /// Partition contents, or `None` if the subject was never written.
    pub fn read(&self, subject: &Term) -> Result<Option<Graph>> {
        let path = self.path_for(subject);
        if !path.is_file() {
            return Ok(None);
        }
        codec::read_partition(&path).map(Some)
    }

    /// Merge `pairs` into the subject's partition.
    ///
    /// A new partition starts with the prefix bindings of `bindings`.
    pub fn merge_insert(
        &self,
        subject: &Term,
        pairs: &[(Term, Term)],
        bindings: &Graph,
    ) -> Result<Graph> {
        let path = self.path_for(subject);
        let mut working = if path.is_file() {
            codec::read_partition(&path)?
        } else {
            let mut fresh = Graph::new();
            fresh.bind_all(bindings);
            fresh
        };

        for (predicate, object) in pairs {
            working.add(Triple::new(subject.clone(), predicate.clone(), object.clone()));
        }
        codec::write_partition(&path, &working)?;
        debug!(subject = %subject, triples = working.len(), "Partition written");
        Ok(working)
    }

    /// Remove `pairs` from the subject's partition. No-op when the subject
    /// has no partition.
    pub fn merge_remove(&self, subject: &Term, pairs: &[(Term, Term)]) -> Result<Option<Graph>> {
        let path = self.path_for(subject);
        if !path.is_file() {
            debug!(subject = %subject, "No partition to remove from");
            return Ok(None);
        }

        let mut working = codec::read_partition(&path)?;
        for (predicate, object) in pairs {
            working.remove(&Triple::new(subject.clone(), predicate.clone(), object.clone()));
        }
        codec::write_partition(&path, &working)?;
        debug!(subject = %subject, triples = working.len(), "Partition rewritten");
        Ok(Some(working))
    }

    fn partition_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if codec::is_partition_file(&path) {
                files.push(path);
            } else if path.is_file() {
                warn!(path = ?path, "Ignoring non-partition file");
            }
        }
        files.sort();
        Ok(files)
    }

    /// Union of every partition. Any corrupt partition aborts the load.
    pub fn load_all(&self) -> Result<Graph> {
        let files = self.partition_files()?;
        let mut graph = Graph::new();
        for path in &files {
            let partition = codec::read_partition(path).map_err(|e| {
                error!(path = ?path, error = %e, "Corrupt partition, refusing to start");
                e
            })?;
            graph.merge(&partition);
        }
        info!(
            partitions = files.len(),
            triples = graph.len(),
            "Loaded partitions from {:?}",
            self.dir
        );
        Ok(graph)
    }

    /// Empty every partition in place. Returns the number of files touched.
    pub fn truncate_all(&self) -> Result<usize> {
        let files = self.partition_files()?;
        for path in &files {
            codec::write_partition(path, &Graph::new())?;
        }
        Ok(files.len())
    }
}
