use insta::{assert_debug_snapshot, assert_snapshot};

use taskboard::format::render_plain_table;
use taskboard::system::process::ProcessRecord;
use taskboard::system::services::ServiceRecord;
use taskboard::system::snapshot::Snapshot;
use taskboard::view::service::ServiceListing;
use taskboard::view::sort::SortState;
use taskboard::view::{ViewId, ViewInput, ViewState, build_rows};

fn proc(pid: u32, name: &str, user: &str, cpu: f32, mem: f32) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.to_string(),
        cpu_percent: cpu,
        memory_percent: mem,
        memory_bytes: 1_048_576,
        status: "Run".to_string(),
        username: Some(user.to_string()),
    }
}

fn snapshot() -> Snapshot {
    Snapshot::new(vec![
        proc(1, "chrome", "alice", 10.0, 5.0),
        proc(2, "svchost", "SYSTEM", 0.5, 1.25),
    ])
}

fn plain(view: ViewId, snapshot: &Snapshot, cpu_count: usize, state: &ViewState) -> String {
    let input = ViewInput {
        snapshot,
        cpu_count,
        services: ServiceListing::Unsupported,
    };
    let rows = build_rows(view, &input, state);
    render_plain_table(view.layout(), &rows)
        .trim_end()
        .to_string()
}

#[test]
fn process_table() {
    let text = plain(ViewId::Processes, &snapshot(), 1, &ViewState::default());
    assert_snapshot!(text, @r"
    PID  Name     CPU %  RAM %
    ---  -------  -----  -----
      1  chrome    10.0   5.00
      2  svchost    0.5   1.25
    ");
}

#[test]
fn user_table() {
    let text = plain(ViewId::Users, &snapshot(), 1, &ViewState::default());
    assert_snapshot!(text, @r"
    User    Processes  CPU %  Memory (MB)  Disk         Network
    ------  ---------  -----  -----------  -----------  -----------
    alice           1  10.0%          1.0  unavailable  unavailable
    SYSTEM          1   0.5%          1.0  unavailable  unavailable
    ");
}

#[test]
fn detail_table_sorted_by_cpu_ascending() {
    let state = ViewState {
        sort: SortState {
            column: Some(4),
            ascending: true,
        },
        ..ViewState::default()
    };
    let text = plain(ViewId::Details, &snapshot(), 1, &state);
    assert_snapshot!(text, @r"
    Name     PID  Status  User    CPU %  Memory (MB)
    -------  ---  ------  ------  -----  -----------
    svchost    2  Run     SYSTEM    0.5          1.0
    chrome     1  Run     alice    10.0          1.0
    ");
}

#[test]
fn service_rows() {
    let services = vec![ServiceRecord {
        name: "Spooler".into(),
        status: "running".into(),
        display_name: "Print Spooler".into(),
    }];
    let empty = Snapshot::empty();
    let input = ViewInput {
        snapshot: &empty,
        cpu_count: 1,
        services: ServiceListing::Listed(&services),
    };
    let rows = build_rows(ViewId::Services, &input, &ViewState::default());
    let cells: Vec<Vec<String>> = rows.into_iter().map(|r| r.cells).collect();
    assert_debug_snapshot!(cells, @r#"
    [
        [
            "Spooler",
            "running",
            "Print Spooler",
        ],
    ]
    "#);
}
