// ABOUTME: Integration tests for controller discovery.
// ABOUTME: Covers strategy order, timeouts, abort on auth failure, and credential slots.

mod support;

use riodeploy::ssh::{self, SessionKind};
use riodeploy::target::{self, Role, Target};
use riodeploy::types::{Strategy, TeamNumber};
use std::time::Duration;
use support::{
    HostBehavior, MDNS_HOST, MockTransport, RecordingReporter, SUBNET_HOST, TEAM, USB_HOST,
};

const TIMEOUT: Duration = Duration::from_secs(2);

fn team() -> TeamNumber {
    TeamNumber::new(TEAM)
}

#[tokio::test]
async fn mdns_wins_when_everything_answers() {
    support::init_tracing();
    let transport = MockTransport::new()
        .with_host(MDNS_HOST, HostBehavior::Reachable)
        .with_host(USB_HOST, HostBehavior::Reachable)
        .with_host(SUBNET_HOST, HostBehavior::Reachable);
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    let address = target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address.strategy, Strategy::Mdns);
    assert_eq!(address.host, MDNS_HOST);
    assert!(address.reachable);
    assert_eq!(transport.connected_hosts(), vec![MDNS_HOST]);
    assert_eq!(transport.disconnects(), 1);
}

#[tokio::test]
async fn falls_back_to_usb_then_subnet() {
    let transport = MockTransport::new()
        .with_host(MDNS_HOST, HostBehavior::Refused)
        .with_host(SUBNET_HOST, HostBehavior::Reachable);
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    let address = target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address.strategy, Strategy::SubnetIp);
    assert_eq!(address.host, SUBNET_HOST);
    assert_eq!(
        transport.connected_hosts(),
        vec![MDNS_HOST, USB_HOST, SUBNET_HOST]
    );
    assert_eq!(
        reporter.lines(),
        vec![
            format!("Trying mDNS connection at {MDNS_HOST}"),
            format!("Trying USB connection at {USB_HOST}"),
            format!("Trying IP connection at {SUBNET_HOST}"),
        ]
    );
}

#[tokio::test]
async fn probes_as_the_service_account() {
    let transport = MockTransport::reachable_via_mdns();
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap();

    let probe = &transport.connects()[0];
    assert_eq!(probe.user, "lvuser");
    assert_eq!(probe.kind, SessionKind::Exec);
}

#[tokio::test]
async fn success_fills_both_slots_with_the_winning_host() {
    let transport = MockTransport::new().with_host(USB_HOST, HostBehavior::Reachable);
    let target = Target::new(transport);
    let reporter = RecordingReporter::new();

    target
        .discoverer(&reporter)
        .discover(team(), Duration::from_millis(500))
        .await
        .unwrap()
        .unwrap();

    let admin = target.sessions().get(Role::Admin).unwrap();
    let service = target.sessions().get(Role::Service).unwrap();
    assert_eq!(admin.host, USB_HOST);
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.connect_timeout, Duration::from_millis(500));
    assert_eq!(service.host, USB_HOST);
    assert_eq!(service.username, "lvuser");
}

#[tokio::test]
async fn nothing_answering_returns_none_and_clears_slots() {
    let transport = MockTransport::reachable_via_mdns();
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap();
    assert!(target.sessions().is_active());

    transport.set_host(MDNS_HOST, HostBehavior::Refused);
    let address = target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap();

    assert!(address.is_none());
    assert!(!target.sessions().is_active());
    assert!(target.sessions().get(Role::Admin).is_none());
    assert!(target.sessions().get(Role::Service).is_none());
}

#[tokio::test(start_paused = true)]
async fn timed_out_candidate_moves_on_after_its_timeout() {
    let transport = MockTransport::new()
        .with_host(MDNS_HOST, HostBehavior::Timeout)
        .with_host(USB_HOST, HostBehavior::Reachable);
    let target = Target::new(transport);
    let reporter = RecordingReporter::new();

    let start = tokio::time::Instant::now();
    let address = target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address.strategy, Strategy::Usb);
    assert!(start.elapsed() >= TIMEOUT);
}

#[tokio::test]
async fn rejected_credentials_abort_discovery() {
    let transport = MockTransport::new()
        .with_host(MDNS_HOST, HostBehavior::AuthRejected)
        .with_host(USB_HOST, HostBehavior::Reachable);
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    let err = target
        .discoverer(&reporter)
        .discover(team(), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        target::Error::Transport(ssh::Error::AuthenticationFailed { .. })
    ));
    assert_eq!(transport.connected_hosts(), vec![MDNS_HOST]);
    assert!(!target.sessions().is_active());
}

#[tokio::test]
async fn other_transport_errors_abort_discovery() {
    let transport = MockTransport::new().with_host(MDNS_HOST, HostBehavior::Broken);
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    let result = target.discoverer(&reporter).discover(team(), TIMEOUT).await;

    assert!(result.is_err());
    assert_eq!(transport.connected_hosts(), vec![MDNS_HOST]);
}

#[tokio::test]
async fn unparseable_team_probes_team_zero_addresses() {
    let transport = MockTransport::new().with_host("10.0.0.2", HostBehavior::Reachable);
    let target = Target::new(transport.clone());
    let reporter = RecordingReporter::new();

    let address = target
        .discoverer(&reporter)
        .discover(TeamNumber::parse_lenient("-42"), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address.host, "10.0.0.2");
    assert_eq!(transport.connected_hosts()[0], "roborio-0-FRC.local");
}
