use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// JSON value kinds, in the order they are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Null,
        Kind::Bool,
        Kind::Number,
        Kind::String,
        Kind::Array,
        Kind::Object,
    ];

    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

/// Per-kind value counts for one stream.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: u64,
    pub null: u64,
    pub bool: u64,
    pub number: u64,
    pub string: u64,
    pub array: u64,
    pub object: u64,
}

impl Stats {
    pub fn record(&mut self, value: &Value) {
        self.total += 1;
        *self.slot(Kind::of(value)) += 1;
    }

    pub fn count(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Null => self.null,
            Kind::Bool => self.bool,
            Kind::Number => self.number,
            Kind::String => self.string,
            Kind::Array => self.array,
            Kind::Object => self.object,
        }
    }

    fn slot(&mut self, kind: Kind) -> &mut u64 {
        match kind {
            Kind::Null => &mut self.null,
            Kind::Bool => &mut self.bool,
            Kind::Number => &mut self.number,
            Kind::String => &mut self.string,
            Kind::Array => &mut self.array,
            Kind::Object => &mut self.object,
        }
    }
}

pub fn render_stats(stats: &Stats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(stats).unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "COUNT"]);
            for kind in Kind::ALL {
                table.add_row(vec![kind.name().to_string(), stats.count(kind).to_string()]);
            }
            table.add_row(vec!["total".to_string(), stats.total.to_string()]);
            table.to_string()
        }
        OutputFormat::Pretty => {
            let kinds = Kind::ALL
                .iter()
                .map(|kind| format!("{}={}", kind.name(), stats.count(*kind)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("total={} {kinds}", stats.total)
        }
    }
}

pub fn print_stats(stats: &Stats, format: OutputFormat) {
    println!("{}", render_stats(stats, format));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Stats {
        let mut stats = Stats::default();
        for value in [json!(1), json!("a"), json!(2.5), json!(null), json!([1])] {
            stats.record(&value);
        }
        stats
    }

    #[test]
    fn counts_by_kind() {
        let stats = sample();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.count(Kind::Number), 2);
        assert_eq!(stats.count(Kind::Object), 0);
    }

    #[test]
    fn json_is_one_object() {
        let rendered = render_stats(&sample(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["total"], 5);
        assert_eq!(parsed["string"], 1);
    }

    #[test]
    fn pretty_lists_every_kind() {
        let rendered = render_stats(&sample(), OutputFormat::Pretty);
        assert_eq!(
            rendered,
            "total=5 null=1 bool=0 number=2 string=1 array=1 object=0"
        );
    }

    #[test]
    fn table_has_header_and_total() {
        let rendered = render_stats(&sample(), OutputFormat::Table);
        assert!(rendered.contains("KIND"));
        assert!(rendered.contains("total"));
    }
}
