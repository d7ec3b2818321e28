//! Output formatting for products (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::extract::ProductRecord;
use crate::rates::Conversion;
use serde::Serialize;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
    conversion: Option<Conversion>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    product: &'a ProductRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted: Option<JsonConverted<'a>>,
}

#[derive(Serialize)]
struct JsonConverted<'a> {
    currency: &'a str,
    amount: f64,
    estimated: bool,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format, conversion: None }
    }

    /// Adds a converted price column.
    pub fn with_conversion(mut self, conversion: Option<Conversion>) -> Self {
        self.conversion = conversion;
        self
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[ProductRecord]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    /// Short console preview: the first `count` products and a remainder line.
    pub fn preview(&self, products: &[ProductRecord], count: usize) -> String {
        let mut lines: Vec<String> = products
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, p)| format!("{}. {}: {}", i + 1, p.name(), p.price()))
            .collect();

        if products.len() > count {
            lines.push(format!("... and {} more", products.len() - count));
        }

        lines.join("\n")
    }

    fn converted(&self, product: &ProductRecord) -> Option<String> {
        self.conversion
            .as_ref()
            .map(|c| format!("{} {:.2}", c.code, c.apply(product.price().amount())))
    }

    fn converted_label(&self) -> Option<String> {
        self.conversion.as_ref().map(|c| {
            if c.is_fallback {
                format!("~{} (est.)", c.code)
            } else {
                format!("~{}", c.code)
            }
        })
    }

    // JSON formatting

    fn json_products(&self, products: &[ProductRecord]) -> String {
        let rows: Vec<JsonRow> = products
            .iter()
            .map(|product| JsonRow {
                product,
                converted: self.conversion.as_ref().map(|c| JsonConverted {
                    currency: &c.code,
                    amount: c.apply(product.price().amount()),
                    estimated: c.is_fallback,
                }),
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_products(&self, products: &[ProductRecord]) -> String {
        let index_width = 4;
        let price_width = 12;
        let name_width = 60;

        let mut lines = Vec::new();

        let (conv_header, conv_rule) = match self.converted_label() {
            Some(label) => (format!("{:<16}  ", label), format!("{:-<16}  ", "")),
            None => (String::new(), String::new()),
        };

        lines.push(format!(
            "{:<index_width$}  {:<price_width$}  {}{}",
            "#", "Price", conv_header, "Name"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<price_width$}  {}{:-<name_width$}",
            "", "", conv_rule, ""
        ));

        for (i, product) in products.iter().enumerate() {
            let converted = self
                .converted(product)
                .map(|c| format!("{:>16}  ", c))
                .unwrap_or_default();

            lines.push(format!(
                "{:<index_width$}  {:>price_width$}  {}{}",
                i + 1,
                product.price().to_string(),
                converted,
                truncate(product.name(), name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_products(&self, products: &[ProductRecord]) -> String {
        let mut lines = Vec::new();

        match self.converted_label() {
            Some(label) => {
                lines.push(format!("| # | Name | Price | {} |", label));
                lines.push("|---|------|-------|------|".to_string());
            }
            None => {
                lines.push("| # | Name | Price |".to_string());
                lines.push("|---|------|-------|".to_string());
            }
        }

        for (i, product) in products.iter().enumerate() {
            let name = product.name().replace('|', "\\|");
            match self.converted(product) {
                Some(conv) => lines.push(format!(
                    "| {} | {} | {} | {} |",
                    i + 1,
                    name,
                    product.price(),
                    conv
                )),
                None => lines.push(format!("| {} | {} | {} |", i + 1, name, product.price())),
            }
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        match &self.conversion {
            Some(c) => format!("name,price,amount,converted_{}", c.code.to_lowercase()),
            None => "name,price,amount".to_string(),
        }
    }

    fn csv_products(&self, products: &[ProductRecord]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            let mut row = format!(
                "{},{},{:.2}",
                Self::csv_escape(product.name()),
                Self::csv_escape(&product.price().to_string()),
                product.price().amount()
            );

            if let Some(c) = &self.conversion {
                row.push_str(&format!(",{:.2}", c.apply(product.price().amount())));
            }

            lines.push(row);
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Cuts `s` to at most `width` characters, marking the cut with `...`.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PriceNormalizer;

    fn make_product(name: &str, price: &str) -> ProductRecord {
        let price = PriceNormalizer::new("R").normalize(price).unwrap();
        ProductRecord::new(name, price).unwrap()
    }

    fn products() -> Vec<ProductRecord> {
        vec![
            make_product("Jimmy Choo Eau de Parfum - 60ml", "R 1499.00"),
            make_product("Widget Pro, 200ml Perfume", "R 799.00"),
        ]
    }

    fn usd() -> Option<Conversion> {
        Some(Conversion { code: "USD".to_string(), rate: 0.05, is_fallback: false })
    }

    #[test]
    fn test_json_products() {
        let output = Formatter::new(OutputFormat::Json).format_products(&products());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["name"], "Jimmy Choo Eau de Parfum - 60ml");
        assert_eq!(parsed[0]["price"]["display"], "R 1499.00");
        assert!(parsed[0].get("converted").is_none());
    }

    #[test]
    fn test_json_with_conversion() {
        let output = Formatter::new(OutputFormat::Json)
            .with_conversion(usd())
            .format_products(&products());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[1]["converted"]["currency"], "USD");
        assert_eq!(parsed[1]["converted"]["amount"], 39.95);
        assert_eq!(parsed[1]["converted"]["estimated"], false);
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_products(&[]), "[]");
    }

    #[test]
    fn test_table_products() {
        let output = Formatter::new(OutputFormat::Table).format_products(&products());
        assert!(output.contains("Price"));
        assert!(output.contains("Name"));
        assert!(output.contains("R 1499.00"));
        assert!(output.contains("Widget Pro, 200ml Perfume"));
        assert!(output.contains("Total: 2 products"));
    }

    #[test]
    fn test_table_with_fallback_conversion() {
        let conversion = Conversion { code: "USD".to_string(), rate: 0.05, is_fallback: true };
        let output = Formatter::new(OutputFormat::Table)
            .with_conversion(Some(conversion))
            .format_products(&products());
        assert!(output.contains("~USD (est.)"));
        assert!(output.contains("USD 74.95"));
    }

    #[test]
    fn test_table_long_name_truncation() {
        let long = format!("{} Perfume", "A".repeat(80));
        let output = Formatter::new(OutputFormat::Table)
            .format_products(&[make_product(&long, "R 10")]);
        assert!(output.contains("..."));
        assert!(!output.contains(&long));
    }

    #[test]
    fn test_table_empty() {
        let output = Formatter::new(OutputFormat::Table).format_products(&[]);
        assert_eq!(output, "No products found.");
    }

    #[test]
    fn test_markdown_products() {
        let products = vec![make_product("Oud | Amber Perfume", "R 300")];
        let output = Formatter::new(OutputFormat::Markdown).format_products(&products);
        assert!(output.contains("| # | Name | Price |"));
        assert!(output.contains("| 1 | Oud \\| Amber Perfume | R 300.00 |"));
        assert!(output.contains("*1 products found*"));
    }

    #[test]
    fn test_csv_products() {
        let output = Formatter::new(OutputFormat::Csv).format_products(&products());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "name,price,amount");
        assert_eq!(lines[1], "Jimmy Choo Eau de Parfum - 60ml,R 1499.00,1499.00");
        assert_eq!(lines[2], "\"Widget Pro, 200ml Perfume\",R 799.00,799.00");
    }

    #[test]
    fn test_csv_with_conversion() {
        let output = Formatter::new(OutputFormat::Csv)
            .with_conversion(usd())
            .format_products(&products());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "name,price,amount,converted_usd");
        assert!(lines[1].ends_with(",74.95"));
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        assert_eq!(Formatter::new(OutputFormat::Csv).format_products(&[]), "name,price,amount");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("plain"), "plain");
        assert_eq!(Formatter::csv_escape("a,b"), "\"a,b\"");
        assert_eq!(Formatter::csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_preview() {
        let formatter = Formatter::new(OutputFormat::Table);
        let preview = formatter.preview(&products(), 1);
        assert_eq!(preview, "1. Jimmy Choo Eau de Parfum - 60ml: R 1499.00\n... and 1 more");
    }
}
