//! Summary, time-series, author, and co-authorship statistics.
//!
//! Everything here is computed in one pass over the fetched records and
//! serialized as a JSON artifact; ordering is deterministic so reruns on
//! identical inputs produce identical files.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use serde::Serialize;

use nomadex_api::{AuthorId, AuthorNameMap, Record, UNKNOWN_AUTHOR};

/// Top-level counts of one export run.
#[derive(Debug, Default, Serialize)]
pub struct SummaryStats {
    pub total_samples: usize,
    pub published_samples: usize,
    pub unpublished_samples: usize,
    pub unique_authors: usize,
    pub unique_uploads: usize,
    pub earliest_upload: Option<DateTime<Utc>>,
    pub latest_upload: Option<DateTime<Utc>>,
}

impl SummaryStats {
    pub fn compute(records: &[Record], names: &AuthorNameMap) -> Self {
        let mut stats = Self {
            total_samples: records.len(),
            unique_authors: names.len(),
            ..Default::default()
        };
        let mut uploads = std::collections::BTreeSet::new();
        for record in records {
            if record.published {
                stats.published_samples += 1;
            } else {
                stats.unpublished_samples += 1;
            }
            if let Some(upload_id) = &record.upload_id {
                uploads.insert(upload_id.as_str());
            }
            if let Some(time) = record.upload_create_time {
                stats.earliest_upload = Some(match stats.earliest_upload {
                    Some(earliest) => earliest.min(time),
                    None => time,
                });
                stats.latest_upload = Some(match stats.latest_upload {
                    Some(latest) => latest.max(time),
                    None => time,
                });
            }
        }
        stats.unique_uploads = uploads.len();
        stats
    }

    /// Render as a table for TTY runs.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Export summary")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").fg(Color::Cyan),
            ]);
        table.add_row(vec!["Samples", &self.total_samples.to_string()]);
        table.add_row(vec!["Published", &self.published_samples.to_string()]);
        table.add_row(vec!["Unpublished", &self.unpublished_samples.to_string()]);
        table.add_row(vec!["Unique authors", &self.unique_authors.to_string()]);
        table.add_row(vec!["Unique uploads", &self.unique_uploads.to_string()]);
        table.add_row(vec!["Earliest upload", &fmt_date(self.earliest_upload)]);
        table.add_row(vec!["Latest upload", &fmt_date(self.latest_upload)]);
        table.to_string()
    }

    /// Log the summary (non-TTY mode).
    pub fn log(&self) {
        log::info!(
            "summary: {} samples ({} published), {} authors, {} uploads",
            self.total_samples,
            self.published_samples,
            self.unique_authors,
            self.unique_uploads
        );
    }
}

fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Samples per `YYYY-MM` month of `upload_create_time`.
///
/// Records without a timestamp are excluded; BTreeMap keys keep months in
/// chronological order.
pub fn time_series(records: &[Record]) -> BTreeMap<String, usize> {
    let mut months = BTreeMap::new();
    for record in records {
        if let Some(time) = record.upload_create_time {
            let month = format!("{:04}-{:02}", time.year(), time.month());
            *months.entry(month).or_insert(0) += 1;
        }
    }
    months
}

/// Per-author contribution counts.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorStat {
    pub author_id: AuthorId,
    pub name: String,
    /// Records with this author as main author.
    pub samples: usize,
    /// Main-authored records that are published.
    pub published: usize,
    /// Records with this author as coauthor.
    pub coauthored: usize,
}

fn author_entry<'a>(
    by_author: &'a mut BTreeMap<AuthorId, AuthorStat>,
    names: &AuthorNameMap,
    id: &AuthorId,
) -> &'a mut AuthorStat {
    by_author.entry(id.clone()).or_insert_with(|| AuthorStat {
        author_id: id.clone(),
        name: names
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        samples: 0,
        published: 0,
        coauthored: 0,
    })
}

/// Contribution counts per author, sorted by main-authored sample count
/// descending, then id.
pub fn author_statistics(records: &[Record], names: &AuthorNameMap) -> Vec<AuthorStat> {
    let mut by_author: BTreeMap<AuthorId, AuthorStat> = BTreeMap::new();

    for record in records {
        if let Some(id) = &record.main_author {
            let stat = author_entry(&mut by_author, names, id);
            stat.samples += 1;
            if record.published {
                stat.published += 1;
            }
        }
        for id in &record.coauthors {
            author_entry(&mut by_author, names, id).coauthored += 1;
        }
    }

    let mut stats: Vec<AuthorStat> = by_author.into_values().collect();
    stats.sort_by(|a, b| {
        b.samples
            .cmp(&a.samples)
            .then_with(|| a.author_id.cmp(&b.author_id))
    });
    stats
}

/// Co-authorship graph: authors as nodes, shared records as weighted edges.
#[derive(Debug, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Serialize)]
pub struct GraphNode {
    pub id: AuthorId,
    pub name: String,
    /// Records this author appears on, as main author or coauthor.
    pub samples: usize,
}

#[derive(Debug, Serialize)]
pub struct GraphEdge {
    pub source: AuthorId,
    pub target: AuthorId,
    /// Number of records the pair appears on together.
    pub weight: usize,
}

/// Build the co-authorship network.
///
/// Edges are undirected: each pair is emitted once with `source < target`,
/// weighted by co-occurrence count. Node and edge order follow id order.
pub fn network_graph(records: &[Record], names: &AuthorNameMap) -> NetworkGraph {
    let mut appearances: BTreeMap<AuthorId, usize> = BTreeMap::new();
    let mut weights: BTreeMap<(AuthorId, AuthorId), usize> = BTreeMap::new();

    for record in records {
        let mut on_record: Vec<&AuthorId> = Vec::new();
        if let Some(id) = &record.main_author {
            on_record.push(id);
        }
        on_record.extend(record.coauthors.iter());
        on_record.sort();
        on_record.dedup();

        for id in &on_record {
            *appearances.entry((*id).clone()).or_insert(0) += 1;
        }
        for (i, a) in on_record.iter().enumerate() {
            for b in &on_record[i + 1..] {
                let key = ((*a).clone(), (*b).clone());
                *weights.entry(key).or_insert(0) += 1;
            }
        }
    }

    let nodes = appearances
        .into_iter()
        .map(|(id, samples)| GraphNode {
            name: names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            id,
            samples,
        })
        .collect();
    let edges = weights
        .into_iter()
        .map(|((source, target), weight)| GraphEdge {
            source,
            target,
            weight,
        })
        .collect();

    NetworkGraph { nodes, edges }
}
