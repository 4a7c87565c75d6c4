/*!
 * Plain-text report writer
 *
 * The report has a fixed two-part structure: a directory tree section,
 * then each collected file's content wrapped in START/END marker lines
 * that embed the file's relative path.
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::types::{DirectoryNode, FileNode, Node};

/// Writer for the collection report
pub struct ReportWriter {
    output_path: PathBuf,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Truncate the output file and write the two-part report
    pub fn write(&self, root: &DirectoryNode) -> io::Result<()> {
        let file = File::create(&self.output_path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "File Structure:")?;
        writeln!(writer, "{}/", root.name)?;
        write_tree(&mut writer, &root.contents, "")?;
        writeln!(writer)?;

        write_contents(&mut writer, root)?;

        writer.flush()
    }
}

fn write_tree<W: Write>(writer: &mut W, nodes: &[Node], prefix: &str) -> io::Result<()> {
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx + 1 == nodes.len();
        let connector = if last { "└── " } else { "├── " };
        match node {
            Node::Directory(dir) => {
                writeln!(writer, "{}{}{}/", prefix, connector, dir.name)?;
                let child_prefix = if last {
                    format!("{}    ", prefix)
                } else {
                    format!("{}│   ", prefix)
                };
                write_tree(writer, &dir.contents, &child_prefix)?;
            }
            Node::File(file) => {
                writeln!(writer, "{}{}{}", prefix, connector, file.name)?;
            }
        }
    }
    Ok(())
}

fn write_contents<W: Write>(writer: &mut W, dir: &DirectoryNode) -> io::Result<()> {
    for node in &dir.contents {
        match node {
            Node::Directory(sub) => write_contents(writer, sub)?,
            Node::File(file) => write_file(writer, file)?,
        }
    }
    Ok(())
}

fn write_file<W: Write>(writer: &mut W, file: &FileNode) -> io::Result<()> {
    writeln!(writer, "----- START OF {} -----", file.path.display())?;
    writer.write_all(file.content.as_bytes())?;
    writeln!(writer, "\n----- END OF {} -----", file.path.display())?;
    writeln!(writer)?;
    writeln!(writer)?;
    Ok(())
}
