pub mod flatten;
pub mod node;
pub mod tree;

use std::path::Path;

use tracing::debug;

use crate::error::ConvertError;
use crate::sanitize;
use crate::storage;

pub use flatten::{flatten, flatten_document, unflatten};
pub use node::Node;
pub use tree::parse_document;

/// Root element of an HPRA product export.
pub const PRODUCTS_TAG: &str = "Products";
/// One product entry under the root.
pub const PRODUCT_TAG: &str = "Product";

/// A converted document ready to be written, with its product count.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutput {
    pub document: Node,
    pub records_processed: usize,
}

impl ConversionOutput {
    pub fn has_records(&self) -> bool {
        self.records_processed > 0
    }
}

pub struct XmlConverter {
    flatten: bool,
}

impl XmlConverter {
    pub fn new(flatten: bool) -> Self {
        Self { flatten }
    }

    /// Parses an XML file into the nested document representation.
    pub fn parse_file(&self, path: &Path) -> Result<Node, ConvertError> {
        let bytes = std::fs::read(path).map_err(|e| ConvertError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse_document(&bytes)
    }

    pub fn convert(&self, path: &Path) -> Result<ConversionOutput, ConvertError> {
        let nested = self.parse_file(path)?;
        let records_processed = count_products(&nested);

        let document = if self.flatten {
            flatten_document(&nested)
        } else {
            nested
        };

        Ok(ConversionOutput {
            document,
            records_processed,
        })
    }

    /// Converts `input` and writes pretty-printed JSON to `output`.
    ///
    /// Nothing is written unless conversion succeeds; an existing `output`
    /// is replaced atomically.
    pub fn convert_to_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionOutput, ConvertError> {
        let converted = self.convert(input)?;
        let json = serde_json::to_vec_pretty(&converted.document)?;
        storage::write_atomic(output, &json)?;

        debug!(
            "Wrote {} ({} records, flatten={})",
            sanitize::redact_path(output),
            converted.records_processed,
            self.flatten
        );

        Ok(converted)
    }
}

/// Counts `Product` entries under a `Products` root. Other roots have none.
pub fn count_products(document: &Node) -> usize {
    document
        .get(PRODUCTS_TAG)
        .and_then(|products| products.get(PRODUCT_TAG))
        .map(|product| product.entries().len())
        .unwrap_or(0)
}
