//! Sorted export with a best-effort degradation chain.
//!
//! The primary file is retried under alternate names when access is denied.
//! Any other failure, or running out of names, switches to a secondary
//! format next to it. If that fails too the rendered table is handed back
//! for the console.

use crate::config::OutputFormat;
use crate::extract::ProductRecord;
use crate::format::Formatter;
use crate::rates::Conversion;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Total attempts at the primary format, counting the original name.
pub const MAX_ATTEMPTS: usize = 3;

/// Where the export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Written in the primary format (possibly under an alternate name)
    Written(PathBuf),
    /// Written in the secondary format
    Secondary(PathBuf),
    /// Nothing could be written; the table to show instead
    Console(String),
}

/// Sorts products by ascending price, keeping the order of equal prices.
pub fn sort_by_price(products: &mut [ProductRecord]) {
    products.sort_by(|a, b| a.price().amount().total_cmp(&b.price().amount()));
}

/// `<stem>_<n>.<ext>` alongside `path`; `n == 0` is `path` itself.
pub fn alternate_path(path: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("products");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

/// Format used when the primary one cannot be written.
pub fn secondary_format(primary: OutputFormat) -> OutputFormat {
    match primary {
        OutputFormat::Csv | OutputFormat::Json => OutputFormat::Markdown,
        OutputFormat::Markdown | OutputFormat::Table => OutputFormat::Csv,
    }
}

/// Writes product exports.
pub struct Exporter {
    conversion: Option<Conversion>,
}

impl Exporter {
    /// Creates an exporter, optionally adding a converted price column.
    pub fn new(conversion: Option<Conversion>) -> Self {
        Self { conversion }
    }

    /// Exports `products` to `path`, choosing the format from its extension.
    ///
    /// An unknown or missing extension exports CSV, with the extension
    /// replaced so the file name matches its contents.
    pub fn export(&self, products: &[ProductRecord], path: &Path) -> ExportOutcome {
        self.export_with(products, path, |p, contents| std::fs::write(p, contents))
    }

    /// Runs the export chain with a custom writer.
    pub fn export_with<W>(&self, products: &[ProductRecord], path: &Path, mut write: W) -> ExportOutcome
    where
        W: FnMut(&Path, &str) -> io::Result<()>,
    {
        let (primary, path) = match OutputFormat::from_extension(path) {
            Some(format) => (format, path.to_path_buf()),
            None => {
                let csv = path.with_extension(OutputFormat::Csv.extension());
                warn!("Unsupported export file {}, writing {} instead", path.display(), csv.display());
                (OutputFormat::Csv, csv)
            }
        };
        let path = path.as_path();
        let contents = self.render(primary, products);

        for attempt in 0..MAX_ATTEMPTS {
            let target = alternate_path(path, attempt);
            match write(&target, &contents) {
                Ok(()) => {
                    info!("Saved {} products to {}", products.len(), target.display());
                    return ExportOutcome::Written(target);
                }
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    warn!(
                        "Permission denied writing {}; the file may be open elsewhere",
                        target.display()
                    );
                }
                Err(e) => {
                    warn!("Failed to write {}: {}", target.display(), e);
                    break;
                }
            }
        }

        let secondary = secondary_format(primary);
        let fallback = path.with_extension(secondary.extension());
        match write(&fallback, &self.render(secondary, products)) {
            Ok(()) => {
                info!("Saved as {} instead: {}", secondary, fallback.display());
                return ExportOutcome::Secondary(fallback);
            }
            Err(e) => warn!("Failed to write {}: {}", fallback.display(), e),
        }

        warn!("Could not save products to disk, showing them instead");
        ExportOutcome::Console(self.render(OutputFormat::Table, products))
    }

    fn render(&self, format: OutputFormat, products: &[ProductRecord]) -> String {
        Formatter::new(format).with_conversion(self.conversion.clone()).format_products(products)
    }
}
