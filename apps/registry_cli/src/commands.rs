//! Operator commands shared by the one-shot subcommands and the shell.
//!
//! Each returns `false` when the coordinator behind it reported a failure;
//! the failure notice itself travels over the event stream.

use directory_core::{Directory, Outcome};
use shared::domain::{ClientId, NewClient};

use crate::render;

pub async fn list(directory: &Directory) -> bool {
    let ok = !directory.load().await.is_failed();
    print_visible(directory).await;
    ok
}

pub async fn filter(directory: &Directory, query: &str) -> bool {
    let ok = !directory.filter(query).await.is_failed();
    print_visible(directory).await;
    ok
}

pub async fn clear_filter(directory: &Directory) {
    directory.set_filter_text("").await;
    print_visible(directory).await;
}

pub async fn create(directory: &Directory, record: NewClient) -> bool {
    match directory.create(record).await {
        Outcome::Applied(client) => {
            println!("{}", render::client_table(&[client]));
            true
        }
        _ => false,
    }
}

pub async fn delete(directory: &Directory, id: ClientId) -> bool {
    !directory.delete(id).await.is_failed()
}

pub async fn route(directory: &Directory, refresh: bool) -> bool {
    let outcome = if refresh {
        directory.refresh_route().await
    } else {
        directory.request_route().await
    };
    let ok = !outcome.is_failed();
    println!("{}", render::route_table(&directory.route_view().await.clients));
    ok
}

async fn print_visible(directory: &Directory) {
    println!("{}", render::client_table(&directory.snapshot().await.visible));
}
