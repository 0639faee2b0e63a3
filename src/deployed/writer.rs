//! Output for the deployed resource listing.

use std::io::Write;

use chrono::{DateTime, Utc};

use super::{human_age, ResourceElement};
use crate::error::Result;

const HEADERS: [&str; 4] = ["NAMESPACE", "NAME", "API_VERSION", "AGE"];

/// Output format for a resource listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Writes a list of deployed resources as a table, JSON or YAML.
#[derive(Debug)]
pub struct ResourceListWriter<'a> {
    resources: &'a [ResourceElement],
    no_headers: bool,
    bold_headers: bool,
}

impl<'a> ResourceListWriter<'a> {
    pub fn new(resources: &'a [ResourceElement], no_headers: bool) -> Self {
        Self {
            resources,
            no_headers,
            bold_headers: false,
        }
    }

    /// Render the table header in bold.
    pub fn with_bold_headers(mut self, bold: bool) -> Self {
        self.bold_headers = bold;
        self
    }

    /// Write in `format`. Ages in the table are computed against `now`.
    pub fn write(&self, out: &mut dyn Write, format: ListFormat, now: DateTime<Utc>) -> Result<()> {
        match format {
            ListFormat::Table => self.write_table(out, now),
            ListFormat::Json => self.write_json(out),
            ListFormat::Yaml => self.write_yaml(out),
        }
    }

    /// Tab-separated columns, each padded to its widest cell.
    pub fn write_table(&self, out: &mut dyn Write, now: DateTime<Utc>) -> Result<()> {
        let rows: Vec<[String; 4]> = self
            .resources
            .iter()
            .map(|r| {
                [
                    r.namespace.clone(),
                    format!("{}/{}", r.resource, r.name),
                    r.api_version.clone(),
                    human_age(r.creation_timestamp, now),
                ]
            })
            .collect();

        let mut widths = [0usize; 4];
        if !self.no_headers {
            for (width, header) in widths.iter_mut().zip(HEADERS) {
                *width = header.len();
            }
        }
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        if !self.no_headers {
            let line = pad_row(HEADERS.map(str::to_string), &widths);
            if self.bold_headers {
                writeln!(out, "{}", console::style(line).bold().force_styling(true))?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }
        for row in rows {
            writeln!(out, "{}", pad_row(row, &widths))?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self.resources)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_yaml(&self, out: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *out, self.resources)?;
        Ok(())
    }
}

fn pad_row(cells: [String; 4], widths: &[usize; 4]) -> String {
    let last = cells.len() - 1;
    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == last {
                cell
            } else {
                format!("{:<width$}", cell, width = widths[i])
            }
        })
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 38).unwrap()
    }

    fn elements() -> Vec<ResourceElement> {
        let created = Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        vec![
            ResourceElement {
                name: "nginx".to_string(),
                namespace: "default".to_string(),
                api_version: "v1".to_string(),
                resource: "services".to_string(),
                creation_timestamp: created,
            },
            ResourceElement {
                name: "nginx".to_string(),
                namespace: "default".to_string(),
                api_version: "apps/v1".to_string(),
                resource: "deployments".to_string(),
                creation_timestamp: created,
            },
        ]
    }

    fn render(writer: &ResourceListWriter<'_>, format: ListFormat) -> String {
        let mut out = Vec::new();
        writer.write(&mut out, format, now()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_with_headers() {
        let resources = elements();
        let table = render(&ResourceListWriter::new(&resources, false), ListFormat::Table);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAMESPACE\tNAME             \tAPI_VERSION\tAGE");
        assert_eq!(lines[1], "default  \tservices/nginx   \tv1         \t38s");
        assert_eq!(lines[2], "default  \tdeployments/nginx\tapps/v1    \t38s");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_table_without_headers() {
        let resources = elements();
        let table = render(&ResourceListWriter::new(&resources, true), ListFormat::Table);
        assert!(!table.contains("NAMESPACE"));
        assert_eq!(table.lines().next(), Some("default\tservices/nginx   \tv1     \t38s"));
    }

    #[test]
    fn test_empty_table_prints_only_headers() {
        let table = render(&ResourceListWriter::new(&[], false), ListFormat::Table);
        assert_eq!(table, "NAMESPACE\tNAME\tAPI_VERSION\tAGE\n");
    }

    #[test]
    fn test_json_field_names() {
        let resources = elements();
        let json = render(&ResourceListWriter::new(&resources, false), ListFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["resource"], "services");
        assert_eq!(parsed[1]["apiVersion"], "apps/v1");
        assert_eq!(parsed[1]["creationTimestamp"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_yaml_output() {
        let resources = elements();
        let yaml = render(&ResourceListWriter::new(&resources, false), ListFormat::Yaml);
        assert!(yaml.starts_with("- name: nginx\n"));
        assert!(yaml.contains("apiVersion: apps/v1"));
    }
}
