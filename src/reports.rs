use crate::config::{ReportConfig, SampleIdPolicy};
use crate::types::{
    GroupCount, IncidentRecord, IncidentSummary, ResolutionRow, ServiceCountRow, SummaryStats,
    TitleCountRow,
};
use crate::util::{average, format_resolution_time};
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn total_count(data: &[IncidentRecord]) -> usize {
    data.len()
}

pub fn group_by_service(data: &[IncidentRecord]) -> Vec<GroupCount> {
    count_by(data.iter().map(|r| r.service.as_str()))
}

pub fn group_by_title(data: &[IncidentRecord]) -> Vec<GroupCount> {
    count_by(data.iter().map(|r| r.title.as_str()))
}

/// Count occurrences per key, largest first. Equal counts keep the order in
/// which their key was first seen.
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(GroupCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first-seen order among ties
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// The `n` slowest incidents, slowest first. Ties stay in source order.
pub fn top_by_resolution_time(data: &[IncidentRecord], n: usize) -> Vec<&IncidentRecord> {
    let mut sorted: Vec<&IncidentRecord> = data.iter().collect();
    sorted.sort_by(|a, b| {
        b.resolution_time_minutes
            .partial_cmp(&a.resolution_time_minutes)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// Incidents that took strictly longer than `threshold_minutes`, in source order.
pub fn long_resolution_time(data: &[IncidentRecord], threshold_minutes: f64) -> Vec<&IncidentRecord> {
    data.iter()
        .filter(|r| r.resolution_time_minutes > threshold_minutes)
        .collect()
}

pub fn service_rows(data: &[IncidentRecord]) -> Vec<ServiceCountRow> {
    group_by_service(data)
        .into_iter()
        .map(|g| ServiceCountRow {
            service: g.key,
            count: g.count,
        })
        .collect()
}

pub fn title_rows(data: &[IncidentRecord], policy: &SampleIdPolicy) -> Vec<TitleCountRow> {
    let mut ids_by_title: HashMap<&str, Vec<&str>> = HashMap::new();
    for r in data {
        ids_by_title
            .entry(r.title.as_str())
            .or_default()
            .push(r.id.as_str());
    }

    group_by_title(data)
        .into_iter()
        .map(|g| {
            let ids = ids_by_title
                .get(g.key.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let sample_id = match policy {
                SampleIdPolicy::Last => ids.last().map(|id| id.to_string()).unwrap_or_default(),
                SampleIdPolicy::First { limit } => {
                    let mut joined = ids
                        .iter()
                        .take(*limit)
                        .copied()
                        .collect::<Vec<_>>()
                        .join(", ");
                    if g.count > *limit {
                        joined.push_str(" ...");
                    }
                    joined
                }
            };
            TitleCountRow {
                title: g.key,
                count: g.count,
                sample_id,
            }
        })
        .collect()
}

pub fn resolution_rows(records: &[&IncidentRecord]) -> Vec<ResolutionRow> {
    records
        .iter()
        .map(|r| ResolutionRow {
            title: r.title.clone(),
            service: r.service.clone(),
            time_to_resolve: format_resolution_time(r.resolution_time_minutes),
            id: r.id.clone(),
        })
        .collect()
}

pub fn generate_summary(data: &[IncidentRecord], config: &ReportConfig) -> IncidentSummary {
    let by_service = service_rows(data);
    let by_title = title_rows(data, &config.sample_ids);
    let slowest = resolution_rows(&top_by_resolution_time(data, config.top_n));
    let over_threshold = resolution_rows(&long_resolution_time(data, config.threshold_minutes));

    let stats = SummaryStats {
        total_alerts: total_count(data),
        total_services: by_service.len(),
        total_titles: by_title.len(),
        over_threshold: over_threshold.len(),
        threshold_minutes: config.threshold_minutes,
        top_n: config.top_n,
        avg_resolution_minutes: average(
            &data
                .iter()
                .map(|r| r.resolution_time_minutes)
                .collect::<Vec<_>>(),
        ),
    };

    IncidentSummary {
        total_alerts: stats.total_alerts,
        by_service,
        by_title,
        slowest,
        over_threshold,
        threshold_minutes: config.threshold_minutes,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::RawIncident;
    use proptest::prelude::*;

    fn record(id: &str, title: &str, service: &str, ttr_ms: f64) -> IncidentRecord {
        IncidentRecord {
            id: id.to_string(),
            title: title.to_string(),
            service: service.to_string(),
            resolution_time_ms: ttr_ms,
            resolution_time_minutes: ttr_ms / 60_000.0,
        }
    }

    fn three_rows() -> Vec<IncidentRecord> {
        normalize(vec![
            RawIncident {
                id: "r1".to_string(),
                title: Some("Latency".to_string()),
                service: Some("A".to_string()),
                resolution_time_ms: Some(30_000.0),
            },
            RawIncident {
                id: "r2".to_string(),
                title: Some("Outage".to_string()),
                service: Some("B".to_string()),
                resolution_time_ms: Some(7_200_000.0),
            },
            RawIncident {
                id: "r3".to_string(),
                title: Some("Latency".to_string()),
                service: Some("A".to_string()),
                resolution_time_ms: Some(1_800_000.0),
            },
        ])
    }

    #[test]
    fn three_row_scenario() {
        let data = three_rows();
        assert_eq!(total_count(&data), 3);
        assert_eq!(
            group_by_service(&data),
            vec![
                GroupCount { key: "A".to_string(), count: 2 },
                GroupCount { key: "B".to_string(), count: 1 },
            ]
        );

        let top = resolution_rows(&top_by_resolution_time(&data, 5));
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, "r2");
        assert_eq!(top[0].time_to_resolve, "2h 0m");
        assert_eq!(top[1].time_to_resolve, "30 mins");

        let long = resolution_rows(&long_resolution_time(&data, 60.0));
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].id, "r2");
        assert_eq!(long[0].service, "B");
        assert_eq!(long[0].time_to_resolve, "2h 0m");
    }

    #[test]
    fn group_ties_keep_first_seen_order() {
        let data = vec![
            record("1", "t", "zeta", 0.0),
            record("2", "t", "alpha", 0.0),
            record("3", "t", "mid", 0.0),
            record("4", "t", "mid", 0.0),
        ];
        let keys: Vec<String> = group_by_service(&data).into_iter().map(|g| g.key).collect();
        assert_eq!(keys, vec!["mid", "zeta", "alpha"]);
    }

    #[test]
    fn top_ties_keep_source_order() {
        let data = vec![
            record("a", "t", "s", 60_000.0),
            record("b", "t", "s", 120_000.0),
            record("c", "t", "s", 120_000.0),
            record("d", "t", "s", 120_000.0),
        ];
        let ids: Vec<&str> = top_by_resolution_time(&data, 2)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn exactly_sixty_minutes_is_not_long() {
        let data = vec![record("a", "t", "s", 3_600_000.0), record("b", "t", "s", 3_600_001.0)];
        let long = long_resolution_time(&data, 60.0);
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].id, "b");
    }

    #[test]
    fn sample_id_is_last_occurrence_by_default() {
        let data = three_rows();
        let rows = title_rows(&data, &SampleIdPolicy::Last);
        assert_eq!(rows[0].title, "Latency");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].sample_id, "r3");
        assert_eq!(rows[1].sample_id, "r2");
    }

    #[test]
    fn first_policy_lists_leading_ids_with_ellipsis() {
        let data: Vec<IncidentRecord> = (0..4)
            .map(|i| record(&format!("id{i}"), "Flap", "s", 0.0))
            .collect();
        let rows = title_rows(&data, &SampleIdPolicy::First { limit: 2 });
        assert_eq!(rows[0].sample_id, "id0, id1 ...");

        let rows = title_rows(&data, &SampleIdPolicy::First { limit: 4 });
        assert_eq!(rows[0].sample_id, "id0, id1, id2, id3");
    }

    #[test]
    fn summary_uses_config_limits() {
        let config = ReportConfig {
            top_n: 1,
            threshold_minutes: 0.25,
            ..ReportConfig::default()
        };
        let summary = generate_summary(&three_rows(), &config);
        assert_eq!(summary.total_alerts, 3);
        assert_eq!(summary.slowest.len(), 1);
        assert_eq!(summary.over_threshold.len(), 3);
        assert_eq!(summary.stats.total_services, 2);
        assert_eq!(summary.stats.total_titles, 2);
        assert_eq!(summary.stats.top_n, 1);
    }

    #[test]
    fn empty_table_yields_empty_views() {
        let summary = generate_summary(&[], &ReportConfig::default());
        assert_eq!(summary.total_alerts, 0);
        assert!(summary.by_service.is_empty());
        assert!(summary.slowest.is_empty());
        assert_eq!(summary.stats.avg_resolution_minutes, 0.0);
    }

    fn arb_records() -> impl Strategy<Value = Vec<IncidentRecord>> {
        prop::collection::vec(
            (0usize..4, 0u32..20_000_000u32),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (svc, ms))| {
                    record(&format!("id{i}"), "t", &format!("svc{svc}"), ms as f64)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn service_counts_sum_to_total(data in arb_records()) {
            let sum: usize = group_by_service(&data).iter().map(|g| g.count).sum();
            prop_assert_eq!(sum, total_count(&data));
        }

        #[test]
        fn top_n_is_sorted_and_dominates_the_rest(data in arb_records(), n in 0usize..8) {
            let top = top_by_resolution_time(&data, n);
            prop_assert!(top.len() <= n);
            prop_assert_eq!(top.len(), n.min(data.len()));
            for pair in top.windows(2) {
                prop_assert!(pair[0].resolution_time_minutes >= pair[1].resolution_time_minutes);
            }
            if let Some(smallest) = top.last() {
                for r in &data {
                    if !top.iter().any(|t| t.id == r.id) {
                        prop_assert!(smallest.resolution_time_minutes >= r.resolution_time_minutes);
                    }
                }
            }
        }

        #[test]
        fn long_subset_is_exact(data in arb_records(), threshold in 0.0f64..400.0) {
            let long = long_resolution_time(&data, threshold);
            let expected: Vec<&str> = data
                .iter()
                .filter(|r| r.resolution_time_minutes > threshold)
                .map(|r| r.id.as_str())
                .collect();
            let got: Vec<&str> = long.iter().map(|r| r.id.as_str()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
