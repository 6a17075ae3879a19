//! Builders for creating test inputs programmatically.

#![allow(dead_code)]

use std::path::Path;

use hpra::config::ReportFormat;
use hpra::pipeline::PipelineConfig;

/// Builder for HPRA-style `Products` exports.
pub struct ProductsXml {
    attributes: Vec<(String, String)>,
    products: Vec<Vec<(String, String)>>,
}

impl ProductsXml {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Add an attribute to the `Products` root.
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a product with the given child elements.
    pub fn product(mut self, fields: &[(&str, &str)]) -> Self {
        self.products.push(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Add `count` products named `Product 1..=count`.
    pub fn numbered(mut self, count: usize) -> Self {
        for i in 1..=count {
            let name = format!("Product {}", i);
            let number = format!("PA{:04}/001/001", i);
            self = self.product(&[("ProductName", &name), ("LicenceNumber", &number)]);
        }
        self
    }

    pub fn build(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Products");
        for (name, value) in &self.attributes {
            xml.push_str(&format!(" {}=\"{}\"", name, value));
        }
        xml.push_str(">\n");
        for product in &self.products {
            xml.push_str("  <Product>\n");
            for (name, value) in product {
                xml.push_str(&format!("    <{0}>{1}</{0}>\n", name, value));
            }
            xml.push_str("  </Product>\n");
        }
        xml.push_str("</Products>\n");
        xml
    }
}

impl Default for ProductsXml {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PipelineConfig` with test-friendly defaults (reports off).
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new(input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            config: PipelineConfig {
                input_directory: input_dir.to_path_buf(),
                output_directory: output_dir.to_path_buf(),
                flatten: false,
                report_enabled: false,
                report_format: ReportFormat::Text,
                checksums_enabled: true,
                checksum_append: false,
            },
        }
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.config.flatten = flatten;
        self
    }

    pub fn report(mut self, format: ReportFormat) -> Self {
        self.config.report_enabled = true;
        self.config.report_format = format;
        self
    }

    pub fn checksums(mut self, enabled: bool) -> Self {
        self.config.checksums_enabled = enabled;
        self
    }

    pub fn checksum_append(mut self, append: bool) -> Self {
        self.config.checksum_append = append;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
