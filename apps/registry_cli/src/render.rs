//! Plain-text rendering of directory state for the terminal.

use directory_core::{DirectoryEvent, Notice, NoticeLevel};
use shared::domain::Client;
use tokio::sync::broadcast;

const EMPTY_DIRECTORY: &str = "Nenhum cliente encontrado.";
const EMPTY_ROUTE: &str = "Nenhuma rota disponível.";

pub fn client_table(clients: &[Client]) -> String {
    if clients.is_empty() {
        return EMPTY_DIRECTORY.to_string();
    }
    let rows = clients.iter().map(client_row).collect::<Vec<_>>();
    table(&["Nome", "E-mail", "Telefone", "Coordenadas", "ID"], &rows)
}

/// Route stops numbered in visiting order.
pub fn route_table(route: &[Client]) -> String {
    if route.is_empty() {
        return EMPTY_ROUTE.to_string();
    }
    let rows = route
        .iter()
        .enumerate()
        .map(|(position, client)| {
            let mut row = vec![(position + 1).to_string()];
            row.extend(client_row(client));
            row
        })
        .collect::<Vec<_>>();
    table(&["#", "Nome", "E-mail", "Telefone", "Coordenadas", "ID"], &rows)
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "erro",
    };
    format!("[{tag}] {}", notice.message)
}

/// Prints every notification published so far. Returns how many were
/// errors.
pub fn flush_notices(events: &mut broadcast::Receiver<DirectoryEvent>) -> usize {
    let mut errors = 0;
    loop {
        match events.try_recv() {
            Ok(DirectoryEvent::Notification(notice)) => {
                if notice.is_error() {
                    errors += 1;
                    eprintln!("{}", notice_line(&notice));
                } else {
                    println!("{}", notice_line(&notice));
                }
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "cli: dropped directory events");
            }
            Err(_) => return errors,
        }
    }
}

fn client_row(client: &Client) -> Vec<String> {
    vec![
        client.name.clone(),
        client.email.clone(),
        client.phone.clone(),
        format!("({}, {})", client.coordinate_x, client.coordinate_y),
        client
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".into()),
    ]
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();

    let mut lines = vec![line(&header, &widths), line(&rule, &widths)];
    lines.extend(rows.iter().map(|row| line(row, &widths)));
    lines.join("\n")
}

fn line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
