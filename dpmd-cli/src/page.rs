//! File-backed editor host: a saved page stands in for the live editor.

use dpmd_babel::EditorHost;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct FileHost {
    path: PathBuf,
    root: Option<String>,
    title: Option<String>,
}

impl FileHost {
    /// Open a saved page. A missing file leaves the host without a document.
    pub fn open(path: impl AsRef<Path>, title: Option<String>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let root = match fs::read_to_string(&path) {
            Ok(html) => Some(html),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };
        Ok(Self { path, root, title })
    }

    /// Write the current content back to the page file.
    pub fn save(&self) -> io::Result<()> {
        match &self.root {
            Some(html) => fs::write(&self.path, html),
            None => Ok(()),
        }
    }
}

impl EditorHost for FileHost {
    fn editable_root(&self) -> Option<String> {
        self.root.clone()
    }

    fn replace_editable_content(&mut self, html: String) {
        self.root = Some(html);
    }

    fn override_title(&self) -> Option<String> {
        self.title.clone()
    }
}
