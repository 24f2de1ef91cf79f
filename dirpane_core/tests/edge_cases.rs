//! Failure and ordering edge cases of the panel controller.

mod support;

use serde_json::Value;

use dirpane_core::config::Settings;
use dirpane_core::directory::ListingError;
use dirpane_core::notifier::StatusLevel;

use support::{Harness, RecordingPersister, fail, resolve};

/// A listing failure empties the entries and pushes one error status.
#[test]
fn listing_failure_is_reported_not_raised() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/root");
    let request = h.lister.last();

    panel.on_directory_fetched(fail(&request, ListingError::PermissionDenied));

    let view = panel.view();
    assert!(view.entries.is_empty());
    assert_eq!(view.listing_error, Some(&ListingError::PermissionDenied));
    assert!(!view.is_loading);

    let statuses = h.notifier.statuses.borrow();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].level, StatusLevel::Error);
    assert!(statuses[0].message.contains("/root"));
    assert!(statuses[0].message.contains("permission denied"));
}

#[test]
fn failure_replaces_previous_entries() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/data");
    panel.on_directory_fetched(resolve(&h.lister.last(), &["a", "b"]));
    assert_eq!(panel.view().entries.len(), 2);

    panel.refresh();
    panel.on_directory_fetched(fail(&h.lister.last(), ListingError::NotFound));
    assert!(panel.view().entries.is_empty());
}

#[test]
fn stale_failure_is_not_reported() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/gone");
    let old = h.lister.last();
    panel.set_path("/home");

    panel.on_directory_fetched(fail(&old, ListingError::NotFound));

    assert!(h.notifier.statuses.borrow().is_empty());
    assert!(panel.view().listing_error.is_none());
}

#[test]
fn successful_listing_clears_previous_error() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/flaky");
    panel.on_directory_fetched(fail(&h.lister.last(), ListingError::Other("busy".into())));

    panel.refresh();
    panel.on_directory_fetched(resolve(&h.lister.last(), &["ok"]));

    assert!(panel.view().listing_error.is_none());
    assert_eq!(panel.view().entries.len(), 1);
}

/// Responses applied in completion order: a faster newer listing wins, the
/// older one arriving afterwards is dropped.
#[test]
fn out_of_order_completion() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/a");
    panel.set_path("/b");
    panel.set_path("/c");

    let (a, b, c) = (h.lister.nth(0), h.lister.nth(1), h.lister.nth(2));
    panel.on_directory_fetched(resolve(&c, &["c1"]));
    panel.on_directory_fetched(resolve(&a, &["a1"]));
    panel.on_directory_fetched(resolve(&b, &["b1"]));

    assert_eq!(panel.view().entries[0].name, "c1");
}

/// Going back to a path does not resurrect the listing of the earlier visit.
#[test]
fn returning_to_path_ignores_earlier_request() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/a");
    let first_visit = h.lister.last();
    panel.set_path("/b");
    panel.set_path("/a");

    panel.on_directory_fetched(resolve(&first_visit, &["old"]));
    assert!(panel.view().entries.is_empty());
    assert!(panel.view().is_loading);
}

/// Unreadable store on mount: fall back to the settings default.
#[test]
fn persister_read_failure_uses_default() {
    let mut settings = Settings::default();
    settings.terminal.start_open = true;
    let persister = RecordingPersister::default();
    persister.fail_reads.set(true);
    let h = Harness::with_settings(settings).with_persister(persister);

    let panel = h.mount("left", "/home");

    assert!(panel.state().is_terminal_open());
    assert_eq!(h.persister.gets_for("terminal.left.isOpen"), 1);
}

/// A failed write keeps the in-memory state and is retried on the next toggle.
#[test]
fn persister_write_failure_keeps_state() {
    let persister = RecordingPersister::default();
    persister.fail_writes.set(true);
    let h = Harness::new().with_persister(persister);
    let mut panel = h.mount("left", "/home");

    panel.toggle_terminal();
    assert!(panel.state().is_terminal_open());
    assert_eq!(h.persister.sets.borrow().len(), 1);
    assert!(h.notifier.statuses.borrow().is_empty());

    h.persister.fail_writes.set(false);
    panel.toggle_terminal();
    assert_eq!(h.persister.sets.borrow().len(), 2);
    assert_eq!(
        h.persister.values.borrow().get("terminal.left.isOpen"),
        Some(&Value::Bool(false))
    );
}

#[test]
fn hidden_toggle_relists_current_path() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/home");
    assert!(!h.lister.last().options.show_hidden);

    panel.toggle_hidden_files();

    let request = h.lister.last();
    assert!(request.options.show_hidden);
    assert_eq!(request.path.to_str(), Some("/home"));
}

#[test]
fn terminal_directory_change_moves_panel() {
    let h = Harness::new().with_persister(RecordingPersister::with("terminal.left.isOpen", true));
    let mut panel = h.mount("left", "/home");
    h.clear_terminal_calls();

    panel.on_terminal_directory_changed("/srv/www");

    assert_eq!(panel.view().path.to_str(), Some("/srv/www"));
    assert_eq!(h.lister.last().path.to_str(), Some("/srv/www"));
    assert!(h.terminal_calls().is_empty());
}

#[test]
fn closed_terminal_syncs_on_next_open() {
    let h = Harness::new();
    let mut panel = h.mount("left", "/home");
    panel.set_path("/tmp");
    panel.set_path("/var");
    assert!(h.terminal_calls().is_empty());

    panel.toggle_terminal();

    let changes: Vec<_> = h
        .terminal_calls()
        .into_iter()
        .filter(|c| matches!(c, support::TerminalCall::ChangeDirectory(_)))
        .collect();
    assert_eq!(changes, vec![support::TerminalCall::ChangeDirectory("/var".into())]);
}
