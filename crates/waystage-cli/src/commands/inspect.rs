use anyhow::Context;
use waystage_format::{FileKind, FileReader};

use super::Artifact;
use crate::types::{DatasourceJson, InspectJson, SummaryJson};

pub(crate) fn cmd_inspect(kind: FileKind, path: &str, limit: usize, json: bool) -> anyhow::Result<()> {
    let file_length_bytes = std::fs::metadata(path)
        .with_context(|| format!("stat {path}"))?
        .len();
    let format_version = if kind.has_fingerprint() {
        FileReader::open(path, kind.read_policy())
            .with_context(|| format!("open {path}"))?
            .fingerprint()
            .map(|fp| {
                let (major, minor, patch) = fp.version();
                format!("{major}.{minor}.{patch}")
            })
    } else {
        None
    };
    let artifact = super::load_with_context(kind, path)?;

    if json {
        let summary = match &artifact {
            Artifact::NodeMapping(m) => SummaryJson::NodeMapping {
                count: m.len(),
                first: &m[..limit.min(m.len())],
            },
            Artifact::Datasources(d) => SummaryJson::Datasources {
                named: d
                    .named()
                    .map(|(id, name)| DatasourceJson {
                        id,
                        name: name.into_owned(),
                    })
                    .collect(),
            },
            Artifact::SegmentData(s) => SummaryJson::SegmentData {
                index_count: s.index().len(),
                segment_count: s.len(),
                first: s.entries().take(limit).collect(),
            },
            Artifact::TurnRestrictions(r) => SummaryJson::TurnRestrictions {
                count: r.len(),
                only_count: r.iter().filter(|r| r.is_only).count(),
                conditional_count: r.iter().filter(|r| !r.is_unconditional()).count(),
                first: &r[..limit.min(r.len())],
            },
        };
        let out = InspectJson {
            path,
            kind: kind.name(),
            file_length_bytes,
            format_version,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Path: {path}");
    println!("Kind: {} ({file_length_bytes} bytes)", kind.name());
    if let Some(v) = format_version {
        println!("Format: {v}");
    }
    match &artifact {
        Artifact::NodeMapping(m) => {
            println!("NodeMappings: count={}", m.len());
            for (i, e) in m.iter().take(limit).enumerate() {
                println!(
                    "  [{i}] node_based={} edge_based={}",
                    e.node_based.get(),
                    e.edge_based.get()
                );
            }
        }
        Artifact::Datasources(d) => {
            println!("Datasources: named={}", d.named_count());
            for (id, name) in d.named() {
                println!("  [{id}] {name}");
            }
        }
        Artifact::SegmentData(s) => {
            println!(
                "SegmentData: index_count={} segment_count={}",
                s.index().len(),
                s.len()
            );
            for (i, e) in s.entries().take(limit).enumerate() {
                println!(
                    "  [{i}] node={} fwd_weight={} rev_weight={} fwd_duration={} rev_duration={} datasource={}",
                    e.node.get(),
                    e.fwd_weight,
                    e.rev_weight,
                    e.fwd_duration,
                    e.rev_duration,
                    e.datasource
                );
            }
        }
        Artifact::TurnRestrictions(r) => {
            println!("TurnRestrictions: count={}", r.len());
            for (i, t) in r.iter().take(limit).enumerate() {
                println!(
                    "  [{i}] via={} from={} to={} {} conditions={}",
                    t.via.get(),
                    t.from.get(),
                    t.to.get(),
                    if t.is_only { "only" } else { "no" },
                    t.conditions.len()
                );
                for c in &t.conditions {
                    println!(
                        "      {} times={} weekdays={} monthdays={}",
                        c.modifier.name(),
                        c.times.len(),
                        c.weekdays.len(),
                        c.monthdays.len()
                    );
                }
            }
        }
    }

    Ok(())
}
