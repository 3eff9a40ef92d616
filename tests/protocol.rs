//! End-to-end protocol properties: liveness, fairness, conservation, and
//! graceful shutdown, checked against the sequenced event stream and the
//! state board of a real run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use roundtable::{Config, ConfigError, Event, EventKind, Phase, Table};

/// Small, fast ring used by every run-based test.
fn fast_config() -> Config {
    Config {
        seats: 5,
        think: Duration::from_millis(50),
        dine: Duration::from_millis(50),
        steps: 2,
        grace: Duration::from_secs(30),
        bus_capacity: 8192,
        ..Config::default()
    }
}

/// Starts collecting every event published on the table's bus.
fn collect_events(table: &Table) -> Arc<Mutex<Vec<Event>>> {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = collected.clone();
    let mut rx = table.bus().subscribe();
    tokio::spawn(async move {
        while let Ok(ev) = rx.recv().await {
            sink.lock().await.push(ev);
        }
    });
    collected
}

/// Runs the table for `window`, then cancels and waits for the drain.
async fn run_for(table: Arc<Table>, window: Duration) {
    let token = CancellationToken::new();
    let handle = {
        let token = token.clone();
        tokio::spawn(async move { table.run(token).await })
    };

    tokio::time::sleep(window).await;
    token.cancel();
    handle
        .await
        .expect("table task panicked")
        .expect("table did not drain within grace");

    // Let the collector and the bus listener catch up with the final
    // events before callers inspect what was recorded.
    tokio::time::sleep(Duration::from_millis(50)).await;
}

/// Returns the recorded events sorted by sequence number.
async fn sorted(collected: &Mutex<Vec<Event>>) -> Vec<Event> {
    let mut events = collected.lock().await.clone();
    events.sort_by_key(|ev| ev.seq);
    events
}

#[tokio::test(start_paused = true)]
async fn test_every_seat_keeps_cycling() {
    let table = Arc::new(Table::new(fast_config(), Vec::new()).unwrap());
    let board = table.board();

    let token = CancellationToken::new();
    let handle = {
        let table = table.clone();
        let token = token.clone();
        tokio::spawn(async move { table.run(token).await })
    };

    tokio::time::sleep(Duration::from_secs(5)).await;
    let first: Vec<u64> = (0..5).map(|seat| board.cycles(seat)).collect();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let second: Vec<u64> = (0..5).map(|seat| board.cycles(seat)).collect();

    token.cancel();
    handle.await.unwrap().unwrap();

    for seat in 0..5 {
        assert!(first[seat] >= 1, "seat {seat} never completed a cycle");
        assert!(
            second[seat] > first[seat],
            "seat {seat} stalled at {} cycles",
            first[seat]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_turns_granted_in_arrival_order() {
    let table = Arc::new(Table::new(fast_config(), Vec::new()).unwrap());
    let collected = collect_events(&table);

    run_for(table, Duration::from_secs(10)).await;

    let events = sorted(&collected).await;
    let requested: Vec<usize> = events
        .iter()
        .filter(|ev| ev.kind == EventKind::TurnRequested)
        .map(|ev| ev.seat.unwrap())
        .collect();
    let granted: Vec<usize> = events
        .iter()
        .filter(|ev| ev.kind == EventKind::TurnGranted)
        .map(|ev| ev.seat.unwrap())
        .collect();

    assert!(requested.len() >= 5, "too few requests to judge order");
    assert!(
        granted.len() <= requested.len(),
        "more grants than requests"
    );
    for (i, seat) in granted.iter().enumerate() {
        assert_eq!(
            *seat, requested[i],
            "grant #{i} went to seat {seat}, but seat {} arrived first",
            requested[i]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_forks_conserved_and_never_double_claimed() {
    let cfg = fast_config();
    let seats = cfg.seats;
    let table = Arc::new(Table::new(cfg, Vec::new()).unwrap());
    let collected = collect_events(&table);

    run_for(table, Duration::from_secs(10)).await;

    let events = sorted(&collected).await;
    let mut held = vec![false; seats];
    let mut held_total = 0usize;
    let mut dining = vec![false; seats];
    let mut dining_total = 0usize;

    for ev in &events {
        match ev.kind {
            EventKind::ForkClaimed => {
                let fork = ev.fork.unwrap();
                assert!(
                    !held[fork],
                    "fork {fork} claimed by seat {:?} while already held",
                    ev.seat
                );
                held[fork] = true;
                held_total += 1;
            }
            EventKind::ForkFreed => {
                let fork = ev.fork.unwrap();
                assert!(held[fork], "fork {fork} freed while not held");
                held[fork] = false;
                held_total -= 1;
            }
            EventKind::PhaseChanged => {
                let seat = ev.seat.unwrap();
                let now_dining = ev.phase == Some(Phase::Dining);
                if now_dining != dining[seat] {
                    dining[seat] = now_dining;
                    if now_dining {
                        dining_total += 1;
                    } else {
                        dining_total -= 1;
                    }
                }
            }
            EventKind::SeatStopped => {
                let seat = ev.seat.unwrap();
                if dining[seat] {
                    dining[seat] = false;
                    dining_total -= 1;
                }
            }
            _ => {}
        }

        assert!(
            held_total <= seats,
            "{held_total} forks held in a ring of {seats}"
        );
        // At most one seat is mid-acquisition (the head of the line), so
        // held forks never exceed the diners' pairs plus that one seat's.
        assert!(
            held_total <= 2 * dining_total + 2,
            "{held_total} forks held while only {dining_total} seats dine"
        );
        // A ring of 5 cannot seat more than 2 concurrent diners.
        assert!(
            dining_total <= 2,
            "{dining_total} seats dining concurrently in a ring of 5"
        );
    }

    assert_eq!(held_total, 0, "forks still held after shutdown");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_returns_every_fork() {
    let table = Arc::new(Table::new(fast_config(), Vec::new()).unwrap());
    let board = table.board();

    run_for(table.clone(), Duration::from_secs(3)).await;

    let snap = board.snapshot();
    assert!(
        snap.forks.iter().all(|&free| free),
        "forks not all free after drain: {:?}",
        snap.forks
    );
    assert!(
        table.tracker().stuck().await.is_empty(),
        "seats still marked alive after drain"
    );
}

#[tokio::test]
async fn test_small_rings_rejected_before_startup() {
    for seats in [0, 2, 3, 4] {
        let cfg = Config {
            seats,
            ..Config::default()
        };
        match Table::new(cfg, Vec::new()) {
            Err(ConfigError::TooFewSeats { seats: reported }) => {
                assert_eq!(reported, seats);
            }
            other => panic!("ring of {seats} accepted: {:?}", other.is_ok()),
        }
    }
}
