use anyhow::{anyhow, bail, Context};
use directory_core::Directory;
use shared::domain::{ClientId, NewClient};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

use crate::{commands, render};

pub const DELETE_PROMPT: &str = "Deseja realmente excluir o cliente? [s/N]";

const HELP: &str = "\
comandos:
  list                                   recarrega e lista todos os clientes
  filter <texto>                         filtra clientes pelo servidor
  clear                                  remove o filtro
  create <nome> <email> <telefone> <x> <y>
  delete <id>                            exclui um cliente (pede confirmação)
  route [refresh]                        mostra a rota otimizada
  help                                   mostra esta ajuda
  quit                                   encerra";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Empty,
    List,
    Filter(String),
    Clear,
    Create(NewClient),
    Delete(ClientId),
    Route { refresh: bool },
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb {
            "" => Self::Empty,
            "list" | "ls" => Self::List,
            "filter" if rest.is_empty() => bail!("uso: filter <texto>"),
            "filter" => Self::Filter(rest.to_string()),
            "clear" => Self::Clear,
            "create" => Self::Create(parse_new_client(rest)?),
            "delete" | "rm" => match rest {
                "" => bail!("uso: delete <id>"),
                id if id.contains(char::is_whitespace) => bail!("uso: delete <id>"),
                id => Self::Delete(ClientId::from(id)),
            },
            "route" => match rest {
                "" => Self::Route { refresh: false },
                "refresh" => Self::Route { refresh: true },
                other => bail!("argumento desconhecido para route: {other}"),
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("comando desconhecido: {other} (digite help)"),
        };
        Ok(command)
    }
}

/// `<name...> <email> <phone> <x> <y>`: the name may contain spaces.
fn parse_new_client(args: &str) -> anyhow::Result<NewClient> {
    let tokens = args.split_whitespace().collect::<Vec<_>>();
    let Some(split) = tokens.len().checked_sub(4).filter(|split| *split > 0) else {
        bail!("uso: create <nome> <email> <telefone> <x> <y>");
    };
    let (name, tail) = tokens.split_at(split);
    let [email, phone, x, y] = tail else {
        bail!("uso: create <nome> <email> <telefone> <x> <y>");
    };
    Ok(NewClient::new(
        name.join(" "),
        *email,
        *phone,
        parse_coordinate(x)?,
        parse_coordinate(y)?,
    ))
}

fn parse_coordinate(raw: &str) -> anyhow::Result<f64> {
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("coordenada inválida: {raw}"))?;
    if !value.is_finite() {
        return Err(anyhow!("coordenada inválida: {raw}"));
    }
    Ok(value)
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

/// Asks for deletion consent. Anything but an explicit yes, including end of
/// input, declines.
pub async fn confirm<R, W>(lines: &mut Lines<R>, out: &mut W) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(format!("{DELETE_PROMPT} ").as_bytes()).await?;
    out.flush().await?;
    Ok(lines.next_line().await?.is_some_and(|answer| is_yes(&answer)))
}

/// Interactive session. Returns when the operator quits or stdin closes.
pub async fn run(directory: &Directory) -> anyhow::Result<()> {
    let mut events = directory.subscribe();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut out = io::stdout();

    println!("{HELP}");
    commands::list(directory).await;
    render::flush_notices(&mut events);

    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            ShellCommand::Empty => {}
            ShellCommand::List => {
                commands::list(directory).await;
            }
            ShellCommand::Filter(query) => {
                commands::filter(directory, &query).await;
            }
            ShellCommand::Clear => commands::clear_filter(directory).await,
            ShellCommand::Create(record) => {
                commands::create(directory, record).await;
            }
            ShellCommand::Delete(id) => {
                if confirm(&mut lines, &mut out).await? {
                    commands::delete(directory, id).await;
                } else {
                    println!("Exclusão cancelada.");
                }
            }
            ShellCommand::Route { refresh } => {
                commands::route(directory, refresh).await;
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
        render::flush_notices(&mut events);
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
