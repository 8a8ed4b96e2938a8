use channel_tracker::{Config, Page, ViewController, ViewState};
use eyre::Context;
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  add <url>       resolve a channel URL and save it
  list | home     reload the saved channels
  delete <name>   delete a saved channel
  open <name>     show a saved channel's recent videos
  search          switch to video search
  find <term>     search videos
  help            show this text
  quit            exit";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let config = Config::from_env().context("load configuration")?;
    let mut view = ViewController::from_config(&config).context("set up clients")?;

    view.show_home().await;
    render(view.state());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await.context("write prompt")?;
        stdout.flush().await.context("flush prompt")?;

        let Some(line) = lines.next_line().await.context("read command")? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => continue,
            "add" => view.submit_channel(arg).await,
            "list" | "home" => view.show_home().await,
            "delete" => view.delete_channel(arg).await,
            "open" => view.open_channel(arg).await,
            "search" => view.open_search(),
            "find" => view.submit_search(arg).await,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "quit" | "exit" => break,
            other => {
                println!("unknown command {other:?}; try `help`");
                continue;
            }
        }
        render(view.state());
    }

    Ok(())
}

fn render(state: &ViewState) {
    println!();
    match &state.page {
        Page::Home => {
            println!("== Saved channels");
            if state.channels.is_empty() {
                println!("(none yet; `add <url>` to save one)");
            } else {
                println!(
                    "{:<32} {:>15} {:>12} {:>8}",
                    "name", "views", "subscribers", "videos"
                );
                for c in &state.channels {
                    println!(
                        "{:<32} {:>15} {:>12} {:>8}",
                        c.name, c.views, c.subscribers, c.video_count
                    );
                }
            }
        }
        Page::ChannelDetail(channel) => {
            println!("== {} ({} subscribers)", channel.name, channel.subscribers);
            render_videos(state);
        }
        Page::Search => {
            if state.search_query.is_empty() {
                println!("== Search videos (`find <term>`)");
            } else {
                println!("== Results for {:?}", state.search_query);
                render_videos(state);
            }
        }
    }
    if let Some(error) = &state.error {
        println!("!! {error}");
    }
}

fn render_videos(state: &ViewState) {
    if state.videos.is_empty() {
        println!("(no videos)");
        return;
    }
    for v in &state.videos {
        println!(
            "{}  {}\n    {} views, {} likes, {} comments  https://youtu.be/{}",
            v.published_at.strftime("%Y-%m-%d"),
            v.title,
            v.view_count,
            v.like_count,
            v.comment_count,
            v.id
        );
    }
}
