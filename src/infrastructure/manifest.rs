// Dashboard manifest encoder - builds the dashboard document from a placed layout
use crate::domain::config_tree::{Dashboard, PanelKind};
use crate::domain::layout::{ColorMapping, Element, GridRect, Layout, PanelView};
use crate::infrastructure::error::{GeneratorError, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "dashboard.grafana.app/v1beta1";
pub const FOLDER_ANNOTATION: &str = "grafana.app/folder";
const DATASOURCE_TYPE: &str = "prometheus";
const TAGS: [&str; 2] = ["generic-dashboard", "generated"];

/// Wrap the dashboard spec in a resource manifest addressed to `folder_uid`.
pub fn dashboard_manifest(folder_uid: &str, dashboard: &Dashboard, layout: &Layout) -> Value {
    json!({
        "apiVersion": API_VERSION,
        "kind": "Dashboard",
        "metadata": {
            "annotations": { (FOLDER_ANNOTATION): folder_uid },
            "name": dashboard.uid,
        },
        "spec": dashboard_spec(dashboard, layout),
    })
}

pub fn dashboard_spec(dashboard: &Dashboard, layout: &Layout) -> Value {
    let mut panels = Vec::new();
    let mut next_id = 1u32;

    for placement in &layout.placements {
        let panel = match &placement.element {
            Element::Banner { content } => banner_panel(content, placement.rect),
            Element::Row { title } => row_panel(title, placement.rect),
            Element::Panel(view) => item_panel(view, placement.rect),
            // regions only, nothing to draw
            Element::Column { .. } | Element::Group { .. } => continue,
        };
        panels.push(with_id(panel, next_id));
        next_id += 1;
    }

    json!({
        "title": dashboard.title,
        "uid": dashboard.uid,
        "tags": TAGS,
        "time": { "from": dashboard.time_range.from, "to": dashboard.time_range.to },
        "timezone": "browser",
        "refresh": dashboard.refresh,
        "editable": false,
        "graphTooltip": 1,
        "schemaVersion": 39,
        "panels": panels,
    })
}

fn with_id(mut panel: Value, id: u32) -> Value {
    if let Some(object) = panel.as_object_mut() {
        object.insert("id".to_string(), json!(id));
    }
    panel
}

fn grid_pos(rect: GridRect) -> Value {
    json!({ "x": rect.x, "y": rect.y, "w": rect.width, "h": rect.height })
}

fn banner_panel(content: &str, rect: GridRect) -> Value {
    json!({
        "type": "text",
        "gridPos": grid_pos(rect),
        "options": { "content": content, "mode": "html" },
    })
}

fn row_panel(title: &str, rect: GridRect) -> Value {
    json!({
        "type": "row",
        "title": title,
        "collapsed": false,
        "gridPos": grid_pos(rect),
        "panels": [],
    })
}

fn item_panel(view: &PanelView, rect: GridRect) -> Value {
    let mappings: Vec<Value> = view
        .mappings
        .iter()
        .enumerate()
        .map(|(index, m)| mapping(index, m))
        .collect();

    let mut panel = json!({
        "type": view.kind.as_str(),
        "title": view.title,
        "description": view.description,
        "gridPos": grid_pos(rect),
        "datasource": { "type": DATASOURCE_TYPE, "uid": view.datasource_uid },
        "targets": [{
            "refId": "A",
            "expr": view.expr,
            "range": true,
            "format": "time_series",
            "legendFormat": view.title,
        }],
        "fieldConfig": {
            "defaults": {
                "min": view.min,
                "max": view.max,
                "mappings": mappings,
            },
            "overrides": [],
        },
    });

    if view.kind == PanelKind::Stat {
        panel["fieldConfig"]["defaults"]["color"] =
            json!({ "mode": "fixed", "fixedColor": view.color });
        panel["options"] = json!({
            "textMode": "name",
            "colorMode": "background_solid",
            "graphMode": "none",
        });
    }

    if !view.link.is_empty() {
        panel["links"] = json!([{
            "title": "Link",
            "type": "link",
            "url": view.link,
            "targetBlank": view.kind == PanelKind::Stat,
        }]);
    }

    panel
}

fn mapping(index: usize, mapping: &ColorMapping) -> Value {
    match mapping {
        ColorMapping::Value { value, color } => json!({
            "type": "value",
            "options": { (value.to_string()): { "color": color, "index": index } },
        }),
        ColorMapping::Range { from, to, color } => json!({
            "type": "range",
            "options": { "from": from, "to": to, "result": { "color": color, "index": index } },
        }),
    }
}

pub fn render_manifest(manifest: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

/// Write the manifest as `<uid>.json` under `directory`, creating it if needed.
pub fn write_manifest(directory: &Path, uid: &str, manifest: &Value) -> Result<PathBuf> {
    std::fs::create_dir_all(directory).map_err(|source| GeneratorError::Write {
        path: directory.to_path_buf(),
        source,
    })?;

    let path = directory.join(format!("{}.json", uid));
    std::fs::write(&path, render_manifest(manifest)?).map_err(|source| GeneratorError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Wrote dashboard manifest {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::generator_service::GeneratorService;
    use pretty_assertions::assert_eq;

    fn manifest_for(yaml: &str) -> Value {
        let dashboard: Dashboard = serde_yaml::from_str(yaml).unwrap();
        let artifacts = GeneratorService::default().generate(&dashboard);
        dashboard_manifest(&dashboard.folder_uid, &artifacts.dashboard, &artifacts.layout)
    }

    #[test]
    fn test_manifest_envelope() {
        let manifest = manifest_for(
            "title: Platform\nuid: platform\nfolderUid: ops\ntimeRange: {from: now-1h, to: now}\nrefresh: 30s",
        );

        assert_eq!(manifest["apiVersion"], API_VERSION);
        assert_eq!(manifest["kind"], "Dashboard");
        assert_eq!(manifest["metadata"]["name"], "platform");
        assert_eq!(manifest["metadata"]["annotations"][FOLDER_ANNOTATION], "ops");
        assert_eq!(manifest["spec"]["title"], "Platform");
        assert_eq!(manifest["spec"]["time"], json!({ "from": "now-1h", "to": "now" }));
        assert_eq!(manifest["spec"]["refresh"], "30s");
        assert_eq!(manifest["spec"]["tags"], json!(["generic-dashboard", "generated"]));
    }

    #[test]
    fn test_panels_skip_regions_and_number_sequentially() {
        let manifest = manifest_for(
            r#"
banner: <h1>ops</h1>
rows:
  - title: Core
    columns:
      - groups:
          - items:
              - { title: api, expr: up, datasourceUid: prom, link: "http://api" }
              - { title: lag, expr: lag, type: timeseries }
"#,
        );
        let panels = manifest["spec"]["panels"].as_array().unwrap();
        let types: Vec<&str> = panels.iter().map(|p| p["type"].as_str().unwrap()).collect();

        assert_eq!(types, vec!["text", "row", "stat", "timeseries"]);
        assert_eq!(panels[0]["options"]["content"], "<h1>ops</h1>");
        assert_eq!(panels[0]["gridPos"], json!({ "x": 0, "y": 0, "w": 24, "h": 2 }));
        assert_eq!(panels[1]["gridPos"], json!({ "x": 0, "y": 2, "w": 24, "h": 1 }));
        assert_eq!(panels[3]["id"], 4);

        let stat = &panels[2];
        assert_eq!(stat["gridPos"], json!({ "x": 0, "y": 3, "w": 2, "h": 1 }));
        assert_eq!(stat["datasource"], json!({ "type": "prometheus", "uid": "prom" }));
        assert_eq!(stat["targets"][0]["expr"], "up");
        assert_eq!(stat["targets"][0]["legendFormat"], "api");
        assert_eq!(stat["links"][0]["url"], "http://api");
        assert_eq!(
            stat["fieldConfig"]["defaults"]["color"],
            json!({ "mode": "fixed", "fixedColor": "grey" })
        );
        assert_eq!(
            stat["fieldConfig"]["defaults"]["mappings"][2],
            json!({
                "type": "range",
                "options": { "from": 0.0, "to": 1.0, "result": { "color": "yellow", "index": 2 } },
            })
        );
        assert_eq!(
            stat["fieldConfig"]["defaults"]["mappings"][0]["options"]["1"]["color"],
            "green"
        );
    }

    #[test]
    fn test_write_manifest_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resources");
        let manifest = manifest_for("title: Platform\nuid: platform");

        let path = write_manifest(&target, "platform", &manifest).unwrap();

        assert_eq!(path, target.join("platform.json"));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, manifest);
    }
}
