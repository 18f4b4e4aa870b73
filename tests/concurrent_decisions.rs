mod common;

use inetgate::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

fn shared_simulator() -> Arc<NetworkSimulator> {
    let config = SimulationConfig::default()
        .enabled(true)
        .with_dns_addr("127.0.0.1:53")
        .with_liveness_timeout(Duration::from_secs(2));
    Arc::new(NetworkSimulator::new(config).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_instance_gives_consistent_answers() {
    let live = common::http_responder(200).await;
    let dead = common::closed_port().await;
    let simulator = shared_simulator();
    let before = simulator.config().clone();

    let mut tasks = JoinSet::new();
    for i in 0..32 {
        let simulator = simulator.clone();
        let (url, expect_redirect) = if i % 2 == 0 {
            (format!("http://{}/sample/{}", live, i), false)
        } else {
            (format!("http://{}/sample/{}", dead, i), true)
        };
        tasks.spawn(async move {
            let redirect = simulator.should_redirect(&url).await;
            let alive = simulator.is_url_alive(&url).await;
            (url, expect_redirect, redirect, alive)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (url, expect_redirect, redirect, alive) = result.unwrap();
        assert_eq!(redirect, expect_redirect, "{}", url);
        assert_eq!(alive, !expect_redirect, "{}", url);
    }

    assert_eq!(simulator.config(), &before);
    assert_eq!(simulator.stats(), Stats::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn dns_selection_is_stable_under_load() {
    let simulator = shared_simulator();

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let simulator = simulator.clone();
        tasks.spawn(async move {
            let alive = simulator.is_host_alive("localhost").await;
            (simulator.dns_servers(), alive)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (servers, alive) = result.unwrap();
        assert_eq!(servers, vec!["127.0.0.1".to_string()]);
        assert!(alive);
    }
}

#[tokio::test]
async fn startup_check_reports_failed_leg() {
    let live = common::http_responder(200).await;
    let dead = common::closed_port().await;

    let healthy = NetworkSimulator::new(
        SimulationConfig::default()
            .enabled(true)
            .with_dns_addr("127.0.0.1:53")
            .with_http_addr(live.to_string()),
    )
    .unwrap();
    assert!(healthy.validate_connection().await.is_ok());

    let broken = NetworkSimulator::new(
        SimulationConfig::default()
            .enabled(true)
            .with_dns_addr("127.0.0.1:53")
            .with_http_addr(dead.to_string()),
    )
    .unwrap();
    let err = broken.validate_connection().await.unwrap_err();
    assert_eq!(err.leg(), Leg::Http);
}
