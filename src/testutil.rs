// src/testutil.rs
//
// fbref-shaped HTML fixtures and a local fake HTTP server shared by the
// unit tests.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Wrap table markup the way fbref lays out a stats page: `main` goes into the
/// live DOM, `trailer` after it (commented-out tables go here).
pub fn fbref_page(main: &str, trailer: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Premier League Stats | FBref.com</title></head>
<body><div id="wrap"><div class="table_container">{main}</div>{trailer}</div></body></html>"#
    )
}

/// A stats table with an over-header row, a rank column, and `body` rows.
pub fn fbref_table(id: &str, columns: &[&str], body: &str) -> String {
    let headers: String = columns
        .iter()
        .map(|c| format!(r#"<th aria-label="{c}" data-stat="{c}" scope="col">{c}</th>"#))
        .collect();
    format!(
        r#"<table class="min_width sortable stats_table" id="{id}" data-cols-to-freeze=",3">
<caption>Player Table</caption>
<thead>
<tr class="over_header"><th aria-label="" data-stat="" colspan="{span}" class="over_header center"></th></tr>
<tr><th aria-label="Rk" data-stat="ranker" scope="col" class="ranker">Rk</th>{headers}</tr>
</thead>
<tbody>
{body}
</tbody>
</table>"#,
        span = columns.len() + 1,
    )
}

/// One body row; cells are emitted in the order given.
pub fn player_row(rank: usize, cells: &[(&str, &str)]) -> String {
    let tds: String = cells
        .iter()
        .map(|(stat, text)| format!(r#"<td class="right" data-stat="{stat}"> {text} </td>"#))
        .collect();
    format!(r#"<tr><th scope="row" class="right" data-stat="ranker">{rank}</th>{tds}</tr>"#)
}

/// The repeated header row fbref drops into long tables.
pub fn repeated_header(columns: &[&str]) -> String {
    let ths: String = columns
        .iter()
        .map(|c| format!(r#"<th data-stat="{c}" scope="col">{c}</th>"#))
        .collect();
    format!(r#"<tr class="thead"><th data-stat="ranker" scope="col">Rk</th>{ths}</tr>"#)
}

/// goals [0, 0, 2], shots [7, 7, 3], plus a repeated header and one row
/// missing `shots`.
pub fn shooting_table() -> String {
    let columns = ["player", "team", "goals", "shots"];
    let body = [
        player_row(
            1,
            &[("player", "Bukayo Saka"), ("team", "Arsenal"), ("goals", "0"), ("shots", "7")],
        ),
        repeated_header(&columns),
        player_row(
            2,
            &[("player", "Martin Ødegaard"), ("team", "Arsenal"), ("goals", "0"), ("shots", "7")],
        ),
        player_row(3, &[("player", "Partial Player"), ("team", "Arsenal"), ("goals", "0")]),
        player_row(
            4,
            &[("shots", "3"), ("goals", "2"), ("team", "Arsenal"), ("player", "Ben White")],
        ),
    ]
    .concat();
    fbref_table("stats_shooting", &columns, &body)
}

pub fn standard_table() -> String {
    let columns = ["player", "games", "goals", "assists", "xg", "xg_assist"];
    let body = [
        player_row(
            1,
            &[("player", "Erling Haaland"), ("games", "9"), ("goals", "11"), ("assists", "0"), ("xg", "8.4"), ("xg_assist", "1.9")],
        ),
        player_row(
            2,
            &[("player", "Dominic Solanke"), ("games", "9"), ("goals", "0"), ("assists", "1"), ("xg", "3.0"), ("xg_assist", "0.4")],
        ),
        player_row(
            3,
            &[("player", "Richarlison"), ("games", "8"), ("goals", "0"), ("assists", "0"), ("xg", "3.0"), ("xg_assist", "0.7")],
        ),
        player_row(
            4,
            &[("player", "Bruno Fernandes"), ("games", "10"), ("goals", "2"), ("assists", "0"), ("xg", "2.1"), ("xg_assist", "2.6")],
        ),
    ]
    .concat();
    fbref_table("stats_standard", &columns, &body)
}

pub fn passing_table() -> String {
    let columns = ["player", "assists", "assisted_shots", "passes_into_penalty_area"];
    let body = [
        player_row(
            1,
            &[("player", "Bruno Fernandes"), ("assists", "0"), ("assisted_shots", "31"), ("passes_into_penalty_area", "22")],
        ),
        player_row(
            2,
            &[("player", "Kevin De Bruyne"), ("assists", "4"), ("assisted_shots", "40"), ("passes_into_penalty_area", "30")],
        ),
        player_row(
            3,
            &[("player", "Pascal Groß"), ("assists", "0"), ("assisted_shots", "18"), ("passes_into_penalty_area", "22")],
        ),
    ]
    .concat();
    fbref_table("stats_passing", &columns, &body)
}

/// A minimal table for the categories the report never reads.
pub fn filler_table(id: &str) -> String {
    let columns = ["player", "minutes"];
    let body = player_row(1, &[("player", "Filler Player"), ("minutes", "90")]);
    fbref_table(id, &columns, &body)
}

/// A one-response-per-connection HTTP server on 127.0.0.1 that answers with
/// `route(method, path) -> (status, body)` and remembers every request head.
pub struct FakeServer {
    pub port: u16,
    heads: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    pub async fn start<R>(route: R) -> Self
    where
        R: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let heads = Arc::new(Mutex::new(Vec::new()));
        let route = Arc::new(route);

        let log = heads.clone();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let route = route.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let Some(head) = read_request(&mut sock).await else {
                        return;
                    };
                    let mut first = head.split_whitespace();
                    let method = first.next().unwrap_or_default().to_string();
                    let path = first.next().unwrap_or_default().to_string();
                    log.lock().unwrap().push(head);

                    let (status, body) = route(&method, &path);
                    let reason = if status < 400 { "OK" } else { "Error" };
                    let resp = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        Self { port, heads }
    }

    /// `"<METHOD> <path>"` for every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.heads
            .lock()
            .unwrap()
            .iter()
            .map(|h| h.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
            .collect()
    }

    /// Value of `header` on the most recent request.
    pub fn last_header(&self, header: &str) -> Option<String> {
        let heads = self.heads.lock().unwrap();
        heads.last()?.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(header)
                .then(|| value.trim().to_string())
        })
    }
}

/// Read one request; returns its head (request line plus headers).
async fn read_request(sock: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = sock.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();

    let body_len = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < head_end + body_len {
        let n = sock.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(head)
}

/// Routes for a chromedriver that hands out session `s1`; `navigate` and
/// `source` answer the `/url` and `/source` commands.
pub fn webdriver_routes(
    navigate: (u16, &'static str),
    source: &'static str,
) -> impl Fn(&str, &str) -> (u16, String) + Send + Sync + 'static {
    move |method: &str, path: &str| match (method, path) {
        ("GET", "/status") => (200, r#"{"value":{"ready":true,"message":"ready"}}"#.to_string()),
        ("POST", "/session") => (
            200,
            r#"{"value":{"sessionId":"s1","capabilities":{"browserName":"chrome"}}}"#.to_string(),
        ),
        ("POST", "/session/s1/url") => (navigate.0, navigate.1.to_string()),
        ("GET", "/session/s1/source") => (200, source.to_string()),
        ("DELETE", "/session/s1") => (200, r#"{"value":null}"#.to_string()),
        _ => (
            404,
            r#"{"value":{"error":"unknown command","message":"no route"}}"#.to_string(),
        ),
    }
}
