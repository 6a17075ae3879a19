use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::pipeline::PipelineError;

pub const XML_EXTENSION: &str = "xml";

/// True when the path carries a `.xml` extension in any letter case.
pub fn is_xml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(XML_EXTENSION))
        .unwrap_or(false)
}

pub struct DirectoryScanner {
    input_directory: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
        }
    }

    /// Lists the XML files directly inside the input directory, sorted by
    /// file name so repeated runs process them in the same order.
    pub fn scan(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1) // Only scan top level, not subdirectories
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PipelineError::Scan {
                path: self.input_directory.clone(),
                source: e,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if is_xml_path(path) {
                debug!("Found XML document: {}", path.display());
                files.push(path.to_path_buf());
            }
        }

        info!(
            "Scanned {} XML documents in {}",
            files.len(),
            self.input_directory.display()
        );
        Ok(files)
    }
}
