//! Text and JSON rendering for command output.
//!
//! Text mode draws tables with comfy-table; JSON mode writes one object per
//! line so several results from one command stay machine readable.

use std::io::{self, Write};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use pagination::{PageMeta, PageView};
use serde::Serialize;
use url::Url;

use super::notifications::{Notification, NotificationKind};
use crate::domain::{FieldConfig, USER_FIELDS, User};

const TABLE_WIDTH: u16 = 120;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope<'a> {
    users: &'a [User],
    page: PageMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a Url>,
}

#[derive(Serialize)]
struct NotificationEnvelope<'a> {
    notification: &'a Notification,
}

#[derive(Serialize)]
struct FieldsEnvelope<'a> {
    fields: &'a [FieldConfig],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeededEnvelope<'a> {
    seed_name: &'a str,
    created: usize,
}

/// Writes command results in the selected format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    json: bool,
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH);
    table
}

fn write_json<W, T>(out: &mut W, value: &T) -> io::Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}

impl Renderer {
    /// Renderer writing JSON when `json` is set, tables otherwise.
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Render one page of users. `corrected` is the rewritten location when
    /// the requested page had to be fixed.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn page<W: Write + ?Sized>(
        &self,
        out: &mut W,
        view: &PageView<'_, User>,
        corrected: Option<&Url>,
    ) -> io::Result<()> {
        if self.json {
            return write_json(
                out,
                &PageEnvelope {
                    users: view.items(),
                    page: view.meta(),
                    location: corrected,
                },
            );
        }

        if view.items().is_empty() {
            writeln!(out, "No users found")?;
        } else {
            let mut table = styled_table();
            let mut header = vec!["ID"];
            header.extend(USER_FIELDS.iter().map(|field| field.label));
            table.set_header(header);
            for user in view.items() {
                let mut row = vec![user.id.to_string()];
                row.extend(
                    USER_FIELDS
                        .iter()
                        .map(|field| user.fields.text(field.name).unwrap_or_default()),
                );
                table.add_row(row);
            }
            writeln!(out, "{table}")?;
        }
        writeln!(
            out,
            "page {} of {} ({} users)",
            view.current_page(),
            view.total_pages(),
            view.total_items()
        )?;
        if let Some(location) = corrected {
            writeln!(out, "location: {location}")?;
        }
        Ok(())
    }

    /// Render a notification line.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn notification<W: Write + ?Sized>(
        &self,
        out: &mut W,
        notice: &Notification,
    ) -> io::Result<()> {
        if self.json {
            return write_json(
                out,
                &NotificationEnvelope {
                    notification: notice,
                },
            );
        }
        match notice.kind() {
            NotificationKind::Success => writeln!(out, "{}", notice.message()),
            NotificationKind::Error => writeln!(out, "error: {}", notice.message()),
        }
    }

    /// Render the form field configuration.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn fields<W: Write + ?Sized>(&self, out: &mut W, fields: &[FieldConfig]) -> io::Result<()> {
        if self.json {
            return write_json(out, &FieldsEnvelope { fields });
        }
        let mut table = styled_table();
        table.set_header(vec!["Field", "Label", "Type", "Required", "Placeholder"]);
        for field in fields {
            table.add_row(vec![
                field.name.to_owned(),
                field.label.to_owned(),
                field.kind.to_string(),
                if field.required { "yes" } else { "no" }.to_owned(),
                field.placeholder.to_owned(),
            ]);
        }
        writeln!(out, "{table}")
    }

    /// Render the outcome of a seeding run.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn seeded<W: Write + ?Sized>(
        &self,
        out: &mut W,
        seed_name: &str,
        created: usize,
    ) -> io::Result<()> {
        if self.json {
            return write_json(out, &SeededEnvelope { seed_name, created });
        }
        writeln!(out, "Seeded {created} users from '{seed_name}'")
    }
}
