use std::{
    fs::File,
    io::{Read, Seek},
    path::{Path, PathBuf},
};

use tracing::debug;
use zip::{ZipArchive, read::ZipFile};

use crate::{
    class::{ClassFile, ParseOptions},
    error::Result,
};

/// Where the bytes of a class file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSource {
    /// A `.class` file on disk.
    File(PathBuf),
    /// An entry of a jar, zip or jmod archive.
    Archive { path: PathBuf, class_name: String },
}

impl ClassSource {
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            ClassSource::File(path) => read_class_file(path),
            ClassSource::Archive { path, class_name } => read_class_from_archive(path, class_name),
        }
    }

    pub fn load(&self, options: &ParseOptions) -> Result<ClassFile> {
        ClassFile::from_bytes(&self.read()?, options)
    }
}

pub fn read_class_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), size = bytes.len(), "read class file");
    Ok(bytes)
}

/// Reads `class_name` (`com/example/Foo`, with or without `.class`) from an archive.
///
/// jmod archives keep their classes under `classes/`; that prefix is tried
/// when the plain name is missing.
pub fn read_class_from_archive(path: impl AsRef<Path>, class_name: &str) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let entry_name = if class_name.ends_with(".class") {
        class_name.to_string()
    } else {
        format!("{class_name}.class")
    };

    let entry_name = if archive.file_names().any(|name| name == entry_name) {
        entry_name
    } else {
        format!("classes/{entry_name}")
    };
    let mut class_file = archive.by_name(&entry_name)?;
    let content = get_class_bytes(&mut class_file)?;

    debug!(
        archive = %path.display(),
        entry = %entry_name,
        size = content.len(),
        "read class from archive"
    );
    Ok(content)
}

// upper bound on how much of the entry header size is trusted up front
const MAX_PREALLOCATION: u64 = 1 << 22;

fn get_class_bytes<R: Read + Seek>(class_file: &mut ZipFile<'_, R>) -> Result<Vec<u8>> {
    let mut content = Vec::with_capacity(class_file.size().min(MAX_PREALLOCATION) as usize);
    class_file.read_to_end(&mut content)?;
    Ok(content)
}
