use anyhow::{anyhow, Context, Result};
use colored::*;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use tracing::{debug, info, warn};

use crate::db::Outcome;

pub const DEFAULT_TEMPLATE_ID: i64 = 1;
pub const DEFAULT_TRANSCRIPT: &str = "A B C D E F G H I J K L M N O P Q R S T U V W X Y Z. \
Now I know my A B Cs. Next time won't you sing with me.";

// Time span (seconds) of the single synthetic segment written with a transcript.
const SEGMENT_START: u32 = 0;
const SEGMENT_END: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRow {
    pub id: i64,
    pub title: Option<String>,
    pub metadata: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptSegment<'a> {
    pub start: u32,
    pub end: u32,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription<'a> {
    pub full_text: &'a str,
    pub segments: Vec<TranscriptSegment<'a>>,
}

// ------------------ INSPECTION ------------------

// Fetch every template row in id order.
pub fn list_templates(conn: &Connection) -> Result<Vec<TemplateRow>> {
    let mut stmt = conn
        .prepare("SELECT id, title, metadata FROM template_videos ORDER BY id")
        .context("Failed to prepare template query")?;

    let rows = stmt
        .query_map([], |r| {
            Ok(TemplateRow {
                id: r.get(0)?,
                title: r.get(1)?,
                metadata: r.get(2)?,
            })
        })
        .context("Failed to query template rows")?;

    let mut templates = Vec::new();
    for row in rows {
        templates.push(row.context("Failed to read template row")?);
    }
    Ok(templates)
}

/// Render a metadata column for display.
///
/// Valid JSON is pretty-printed with two-space indentation. Anything that does not
/// parse is returned verbatim, and a NULL column renders as `None` like a NULL title.
pub fn render_metadata(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "None".to_string();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| raw.to_string()),
        Err(e) => {
            debug!(error = %e, "metadata is not valid JSON, printing raw text");
            raw.to_string()
        }
    }
}

// Print all templates with their metadata to `out`.
pub fn inspect_templates(conn: &Connection, out: &mut impl Write) -> Result<usize> {
    let templates = list_templates(conn)?;
    for t in &templates {
        writeln!(out, "ID: {}, Title: {}", t.id, t.title.as_deref().unwrap_or("None"))?;
        writeln!(out, "Metadata: {}", render_metadata(t.metadata.as_deref()))?;
        writeln!(out, "{}", "-".repeat(20))?;
    }
    Ok(templates.len())
}

// ------------------ TRANSCRIPT ------------------

// Write `text` as the template transcript at both locations consumers may read:
// the top-level `transcript` field and `pipeline.transcription`.
pub fn apply_transcript(metadata: &mut Value, text: &str) -> Result<()> {
    let doc = metadata
        .as_object_mut()
        .ok_or_else(|| anyhow!("metadata is not a JSON object"))?;

    doc.insert("transcript".to_string(), Value::String(text.to_string()));

    let pipeline = doc
        .entry("pipeline")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| anyhow!("metadata.pipeline is not a JSON object"))?;

    let transcription = Transcription {
        full_text: text,
        segments: vec![TranscriptSegment {
            start: SEGMENT_START,
            end: SEGMENT_END,
            text,
        }],
    };
    pipeline.insert(
        "transcription".to_string(),
        serde_json::to_value(&transcription).context("Failed to serialize transcription")?,
    );
    Ok(())
}

// Merge a transcript into one template's metadata and write it back.
// Read and write share a transaction so a concurrent writer cannot slip in between.
pub fn update_transcript(conn: &mut Connection, id: i64, text: &str) -> Result<Outcome> {
    let tx = conn.transaction().context("Failed to start transaction")?;

    let row: Option<Option<String>> = tx
        .query_row(
            "SELECT metadata FROM template_videos WHERE id = ?1",
            params![id],
            |r| r.get(0),
        )
        .optional()
        .context("Failed to query template metadata")?;

    let raw = match row {
        None => {
            println!("{}", format!("Template ID {id} not found").yellow());
            return Ok(Outcome::NotFound);
        }
        Some(None) => {
            warn!(id, "template has NULL metadata");
            return Err(anyhow!("Template ID {id} has no metadata"));
        }
        Some(Some(raw)) => raw,
    };

    let mut metadata: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Metadata for template ID {id} is not valid JSON"))?;
    apply_transcript(&mut metadata, text)
        .with_context(|| format!("Cannot merge transcript into template ID {id}"))?;

    let new_metadata = serde_json::to_string(&metadata).context("Failed to serialize metadata")?;
    tx.execute(
        "UPDATE template_videos SET metadata = ?1 WHERE id = ?2",
        params![new_metadata, id],
    )
    .context("Failed to write template metadata")?;
    tx.commit().context("Failed to commit metadata update")?;

    info!(id, bytes = new_metadata.len(), "template transcript updated");
    println!("{}", format!("Updated metadata for template ID {id}").green());
    Ok(Outcome::Done)
}
