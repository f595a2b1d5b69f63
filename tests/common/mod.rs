//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use exec_gateway::config::{AppConfig, ExecutionConfig};
use exec_gateway::health::HealthSignal;
use tokio::sync::watch;

/// Build a valid gateway config bound to an ephemeral loopback port.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.service.connection.host = "localhost".to_string();
    config.service.executions.push(ExecutionConfig {
        alias: "echo".to_string(),
        command: "echo ${text}".to_string(),
        default_parameters: [("text".to_string(), "hello".to_string())].into(),
        add_output_to_response: true,
        timeout_ms: 5_000,
    });
    config
}

/// Wait for the orchestrator's server to bind and return its actual address.
#[allow(dead_code)]
pub async fn wait_for_bound(rx: &mut watch::Receiver<Option<SocketAddr>>) -> SocketAddr {
    let addr = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|addr| addr.is_some()))
        .await
        .expect("server never bound")
        .unwrap();
    (*addr).unwrap()
}

/// Poll the readiness probe until it answers 200, or panic after a deadline.
#[allow(dead_code)]
pub async fn wait_for_ready(addr: SocketAddr) {
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/health/ready");
    for _ in 0..100 {
        if let Ok(response) = client.get(&url).send().await {
            if response.status() == 200 {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway at {addr} never became ready");
}

/// Watch readiness transitions and record any moment where readiness is up
/// while liveness is down.
#[allow(dead_code)]
pub fn spawn_health_ordering_watcher(health: &HealthSignal) -> Arc<AtomicBool> {
    let violated = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&violated);
    let observer = health.clone();
    let mut ready = health.subscribe_ready();
    tokio::spawn(async move {
        while ready.changed().await.is_ok() {
            if *ready.borrow() && !observer.is_live() {
                flag.store(true, Ordering::SeqCst);
            }
        }
    });
    violated
}

/// Record whether readiness was ever observed up.
#[allow(dead_code)]
pub fn spawn_ready_recorder(health: &HealthSignal) -> Arc<AtomicBool> {
    let seen = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&seen);
    let mut ready = health.subscribe_ready();
    tokio::spawn(async move {
        while ready.changed().await.is_ok() {
            if *ready.borrow() {
                flag.store(true, Ordering::SeqCst);
            }
        }
    });
    seen
}
