//! JSON export of a resolved topology.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use super::topology::TopologyData;

/// Build the export document: summary, node statuses, edge styles, diagnostics.
pub fn report(data: &TopologyData) -> Value {
    let counts = data.counts();
    let summary = json!({
        "total_nodes": counts.total,
        "total_edges": data.edges.len(),
        "runtime_active": counts.runtime_active,
        "runtime_error": counts.runtime_error,
        "operational_active": counts.operational_active,
        "operational_error": counts.operational_error,
        "cycles": data.graph.has_cycles(),
    });

    let nodes: Vec<Value> = data
        .nodes()
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "label": n.label,
                "type": n.kind().as_str(),
                "status": n.status,
                "members": n.members,
                "message": n.data.as_entity().and_then(|(_, f)| f.message.as_deref()),
            })
        })
        .collect();

    let edges: Vec<Value> = data
        .edges
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "source": e.source,
                "target": e.target,
                "status_node": e.status_node,
                "status": e.status,
                "color": e.style.color,
                "animated": e.style.animated,
                "description": e.describe(),
            })
        })
        .collect();

    let diagnostics: Vec<Value> = data
        .diagnostics()
        .iter()
        .map(|d| {
            json!({
                "severity": d.severity().symbol(),
                "node": d.node_id(),
                "message": d.to_string(),
            })
        })
        .collect();

    json!({
        "timestamp_ms": data.timestamp_ms,
        "summary": summary,
        "nodes": nodes,
        "edges": edges,
        "diagnostics": diagnostics,
    })
}

/// Write the export document to a file as pretty-printed JSON.
pub fn write_report(data: &TopologyData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&report(data))?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    tracing::info!(path = %path.display(), "exported topology");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use topowatch_types::{ConnectionState, TopologySnapshot};

    fn sample() -> TopologyData {
        let snapshot = TopologySnapshot::builder()
            .timestamp_ms(42)
            .adapter("a1", |f| f.connected().started().mappings(1))
            .adapter("a2", |f| f.connection(ConnectionState::Error))
            .group("g1", ["a1", "a2", "g1"])
            .edge("a1", "g1")
            .build();
        TopologyData::from_snapshot(&snapshot)
    }

    #[test]
    fn report_contains_statuses_and_styles() {
        let report = report(&sample());

        assert_eq!(report["timestamp_ms"], 42);
        assert_eq!(report["summary"]["total_nodes"], 3);
        assert_eq!(report["summary"]["cycles"], true);
        assert_eq!(report["nodes"][0]["status"]["runtime"], "ACTIVE");
        assert_eq!(report["nodes"][0]["type"], "ADAPTER");
        assert_eq!(report["edges"][0]["color"], "success");
        assert_eq!(report["edges"][0]["animated"], true);
        assert_eq!(report["diagnostics"][0]["severity"], "ERR");
    }

    #[test]
    fn write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        write_report(&sample(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["total_edges"], 1);
    }
}
