//! Terminal front end for the customer registry.
//!
//! Reads one command per line and drives a `TableCoordinator`; the table is
//! printed again whenever a fetch lands.

use std::sync::Arc;

use chrono::Utc;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use curiosidade_crm::coordinator::{
    CoordinatorHandle, FilterCell, TableCoordinator, TableIntent, TableQuery, TableView,
};
use curiosidade_crm::db::establish_connection_pool;
use curiosidade_crm::domain::query::{FilterBucket, SortColumn};
use curiosidade_crm::models::config::ServerConfig;
use curiosidade_crm::repository::{CustomerReader, DieselRepository};

const HELP: &str = "\
comandos:
  search <texto>   busca por nome, e-mail, telefone ou endereço
  sort <coluna>    nome | email | status | created_at (repetir inverte)
  filter <filtro>  all | last30days | pending
  page <n>         vai para a página n
  stats            totais do painel
  refresh          recarrega a página atual
  quit             sai";

enum Command {
    Intent(TableIntent),
    Stats,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

    let command = match verb {
        "search" => Command::Intent(TableIntent::SearchText(rest.to_string())),
        "sort" => Command::Intent(TableIntent::Sort(
            rest.parse::<SortColumn>().map_err(|e| e.to_string())?,
        )),
        "filter" => Command::Intent(TableIntent::Filter(
            rest.parse::<FilterBucket>().map_err(|e| e.to_string())?,
        )),
        "page" => Command::Intent(TableIntent::Page(
            rest.trim()
                .parse::<usize>()
                .map_err(|_| format!("página inválida: {rest}"))?,
        )),
        "refresh" => Command::Intent(TableIntent::Refresh),
        "stats" => Command::Stats,
        "help" | "" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("comando desconhecido: {other}")),
    };
    Ok(command)
}

fn page_bar(view: &TableView) -> String {
    view.pages()
        .into_iter()
        .map(|page| match page {
            Some(n) if n == view.query.page => format!("[{n}]"),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_view(view: &TableView) {
    println!(
        "\n-- filtro: {} | ordem: {} {} | busca: {}",
        view.query.filter,
        view.query.sort_column,
        view.query.sort_direction,
        view.query.search.as_deref().unwrap_or("-"),
    );
    if view.items.is_empty() {
        println!("Nenhum cliente encontrado");
    }
    for customer in &view.items {
        println!(
            "{:>5}  {:<30}  {:<32}  {:<7}  {}",
            customer.id,
            customer.name,
            customer.email,
            customer.status_label(),
            customer.created_at.format("%d/%m/%Y"),
        );
    }
    println!(
        "Página {} de {} ({} registros)  {}",
        view.query.page,
        view.total_pages(),
        view.total_count,
        page_bar(view),
    );
}

/// Prints every settled view and every notice until the coordinator stops.
async fn render_loop(mut views: watch::Receiver<TableView>, mut handle: CoordinatorHandle) {
    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if !view.loading {
                    print_view(&view);
                }
            }
            notice = handle.next_notice() => match notice {
                Some(notice) => eprintln!("{notice}"),
                None => break,
            },
        }
    }
}

async fn print_stats(repo: Arc<DieselRepository>) {
    let now = Utc::now().naive_utc();
    match tokio::task::spawn_blocking(move || repo.dashboard_aggregate(now)).await {
        Ok(Ok(aggregate)) => println!(
            "Total de cadastros: {}\nCadastros nos últimos 30 dias: {}\nCadastros com pendência de revisão: {}",
            aggregate.total_count, aggregate.recent_count, aggregate.pending_count
        ),
        Ok(Err(err)) => log::error!("Failed to load dashboard aggregate: {err}"),
        Err(err) => log::error!("Dashboard task failed: {err}"),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };
    let repo = Arc::new(DieselRepository::new(pool));

    let (handle, task) =
        TableCoordinator::spawn(Arc::clone(&repo), TableQuery::default(), FilterCell::default());
    let intents = handle.sender();
    let renderer = tokio::spawn(render_loop(handle.subscribe(), handle));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("Failed to read stdin: {err}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Command::Intent(intent)) => {
                if intents.send(intent).await.is_err() {
                    break;
                }
            }
            Ok(Command::Stats) => print_stats(Arc::clone(&repo)).await,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    // The renderer owns the handle, and with it a sender; the coordinator
    // stops once every sender is gone.
    renderer.abort();
    let _ = renderer.await;
    drop(intents);
    if let Err(err) = task.await {
        log::error!("Coordinator task failed: {err}");
    }
}
