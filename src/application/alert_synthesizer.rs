// Alert synthesizer - turns per-item ranges into alerting rules
use crate::domain::alert::{AlertAnnotations, AlertGroup, AlertLabels, AlertRule};
use crate::domain::config_tree::{Dashboard, Item, Range};

pub const GROUP_INTERVAL: &str = "1m";
pub const RULE_FOR: &str = "5m";

/// Build the single alert group of a resolved dashboard. A dry run still
/// yields that one named group, with an empty rule list.
pub fn synthesize(dashboard: &Dashboard) -> AlertGroup {
    let mut group = AlertGroup::new(dashboard.title.clone(), GROUP_INTERVAL);

    if dashboard.dry_run {
        tracing::info!("Dry run for {}: no alert rules generated", dashboard.uid);
        return group;
    }

    for item in dashboard.items() {
        if item.settings.flags.alerting_off() {
            tracing::debug!("Alerting disabled for {}", item.title);
            continue;
        }
        group.rules.extend(item_rules(item));
    }

    tracing::debug!("Generated {} alert rules for {}", group.rules.len(), dashboard.uid);
    group
}

fn item_rules(item: &Item) -> impl Iterator<Item = AlertRule> + '_ {
    let flags = item.settings.flags;
    item.settings
        .ranges
        .iter()
        .filter(|range| range.is_alertable())
        .filter(move |range| flags.allows_severity(&range.severity))
        .map(move |range| AlertRule {
            alert: item.title.clone(),
            expr: range_expr(&item.expr, range),
            for_duration: RULE_FOR.to_string(),
            labels: AlertLabels {
                severity: range.severity.clone(),
                service: item.settings.service.clone(),
            },
            annotations: AlertAnnotations {
                summary: format!("{} became {}", item.title, range.severity),
            },
        })
}

/// A point range keeps the legacy all-zero test; anything wider becomes a
/// closed interval with the query repeated on both sides.
pub fn range_expr(expr: &str, range: &Range) -> String {
    if range.is_point() {
        format!("({}) == 0", expr)
    } else {
        format!(
            "({expr}) >= {} and ({expr}) <= {}",
            format_bound(range.min),
            format_bound(range.max)
        )
    }
}

/// Shortest round-trip decimal, never in exponent form.
pub fn format_bound(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings_resolver::resolve;
    use pretty_assertions::assert_eq;

    fn resolved(yaml: &str) -> Dashboard {
        resolve(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_range_expr() {
        assert_eq!(
            range_expr("up", &Range::new(0.0, 1.0, "yellow", "warning")),
            "(up) >= 0 and (up) <= 1"
        );
        assert_eq!(
            range_expr("up", &Range::new(0.0, 0.0, "red", "critical")),
            "(up) == 0"
        );
        assert_eq!(
            range_expr("rate(x[5m])", &Range::new(0.25, 1.5, "", "warning")),
            "(rate(x[5m])) >= 0.25 and (rate(x[5m])) <= 1.5"
        );
    }

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(1.0), "1");
        assert_eq!(format_bound(-2.5), "-2.5");
        assert_eq!(format_bound(0.1), "0.1");
        assert_eq!(format_bound(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_default_ranges_produce_critical_and_warning() {
        let dashboard = resolved(
            r#"
title: Platform
rows:
  - columns:
      - groups:
          - items: [{ title: api, expr: up, service: web }]
"#,
        );
        let group = synthesize(&dashboard);

        assert_eq!(group.name, "Platform");
        assert_eq!(group.interval, "1m");
        assert_eq!(
            group.rules,
            vec![
                AlertRule {
                    alert: "api".to_string(),
                    expr: "(up) == 0".to_string(),
                    for_duration: "5m".to_string(),
                    labels: AlertLabels {
                        severity: "critical".to_string(),
                        service: "web".to_string(),
                    },
                    annotations: AlertAnnotations {
                        summary: "api became critical".to_string(),
                    },
                },
                AlertRule {
                    alert: "api".to_string(),
                    expr: "(up) >= 0 and (up) <= 1".to_string(),
                    for_duration: "5m".to_string(),
                    labels: AlertLabels {
                        severity: "warning".to_string(),
                        service: "web".to_string(),
                    },
                    annotations: AlertAnnotations {
                        summary: "api became warning".to_string(),
                    },
                },
            ]
        );
    }

    #[test]
    fn test_critical_disabled_keeps_warning_only() {
        let dashboard = resolved(
            r#"
rows:
  - columns:
      - groups:
          - items:
              - title: api
                expr: up
                criticalDisabled: true
                ranges:
                  - { min: 0, max: 0, color: red, severity: critical }
                  - { min: 0, max: 1, color: yellow, severity: warning }
"#,
        );
        let rules = synthesize(&dashboard).rules;

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].labels.severity, "warning");
    }

    #[test]
    fn test_inherited_disable_flags_skip_items() {
        let dashboard = resolved(
            r#"
rows:
  - itemSettings: { disabled: true }
    columns:
      - groups:
          - items: [{ title: a, expr: up }]
  - columns:
      - itemSettings: { alertingDisabled: true }
        groups:
          - items: [{ title: b, expr: up }]
      - groups:
          - itemSettings: { warningDisabled: true }
            items: [{ title: c, expr: up }]
"#,
        );
        let rules = synthesize(&dashboard).rules;

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].alert, "c");
        assert_eq!(rules[0].labels.severity, "critical");
    }

    #[test]
    fn test_duplicate_ranges_keep_order_and_multiplicity() {
        let dashboard = resolved(
            r#"
rows:
  - columns:
      - groups:
          - items:
              - title: q
                expr: depth
                ranges:
                  - { min: 10, max: 20, severity: warning }
                  - { min: 0, max: 5, color: green }
                  - { min: 20, max: 100, severity: critical }
                  - { min: 10, max: 20, severity: warning }
"#,
        );
        let rules = synthesize(&dashboard).rules;
        let exprs: Vec<&str> = rules.iter().map(|r| r.expr.as_str()).collect();

        assert_eq!(
            exprs,
            vec![
                "(depth) >= 10 and (depth) <= 20",
                "(depth) >= 20 and (depth) <= 100",
                "(depth) >= 10 and (depth) <= 20",
            ]
        );
    }

    #[test]
    fn test_dry_run_yields_no_rules() {
        let dashboard = resolved(
            "title: t\ndryRun: true\nrows: [{columns: [{groups: [{items: [{title: a, expr: up}]}]}]}]",
        );
        let group = synthesize(&dashboard);

        assert_eq!(group.name, "t");
        assert!(group.rules.is_empty());
    }
}
