use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use okashi_core::{
    update, AppState, ChannelListObserver, ListEvent, Msg, SearchOutcome, UploadStatus,
};

mod effects;

use effects::EffectRunner;

fn main() -> anyhow::Result<()> {
    pipeline_logging::init_terminal(log::LevelFilter::Info);

    let mut args = std::env::args().skip(1).peekable();
    match args.peek().map(String::as_str) {
        Some("--upload") => {
            args.next();
            let path = args.next().context("--upload needs a file path")?;
            run_upload(&path)
        }
        Some(_) => {
            let keyword = args.collect::<Vec<_>>().join(" ");
            run_search(&keyword)
        }
        None => bail!("usage: okashi_app <keyword...> | okashi_app --upload <image.png>"),
    }
}

fn run_search(keyword: &str) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx.clone());

    let (list_tx, list_rx) = mpsc::channel::<ListEvent>();
    let mut state = AppState::new();
    state.attach_observer(Box::new(ChannelListObserver::new(list_tx)));

    let _ = msg_tx.send(Msg::KeywordSubmitted(keyword.to_string()));

    // Single-context message pump: all state mutation happens here.
    loop {
        let msg = msg_rx
            .recv_timeout(Duration::from_secs(60))
            .context("engine went quiet")?;
        let finished = matches!(msg, Msg::SearchFinished { .. });
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        print_list_events(&list_rx);
        if finished {
            break;
        }
    }

    match state.view().last_search {
        Some(SearchOutcome::Completed { enriched, skipped }) => {
            println!("done: {enriched} shown, {skipped} skipped");
            Ok(())
        }
        Some(SearchOutcome::Failed { message }) => bail!("search failed: {message}"),
        None => bail!("search never finished"),
    }
}

fn print_list_events(list_rx: &mpsc::Receiver<ListEvent>) {
    while let Ok(event) = list_rx.try_recv() {
        match event {
            ListEvent::Cleared => println!("--- results ---"),
            ListEvent::Appended { index, record } => println!(
                "{:>2}. {} ({}x{}, {} bytes) {}",
                index + 1,
                record.name,
                record.image.width,
                record.image.height,
                record.image.bytes.len(),
                record.link
            ),
        }
    }
}

fn run_upload(path: &str) -> anyhow::Result<()> {
    let image_png = std::fs::read(path).with_context(|| format!("read {path}"))?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx.clone());
    let mut state = AppState::new();

    let _ = msg_tx.send(Msg::UploadSubmitted { image_png });
    println!("uploading, please wait...");

    loop {
        let msg = msg_rx
            .recv_timeout(Duration::from_secs(60))
            .context("engine went quiet")?;
        let finished = matches!(msg, Msg::UploadFinished { .. });
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        if finished {
            break;
        }
    }

    match state.view().upload {
        UploadStatus::Done { response } => {
            // The server's text is shown verbatim, whatever it says.
            println!("{response}");
            Ok(())
        }
        UploadStatus::Failed { message } => bail!("upload failed: {message}"),
        UploadStatus::Idle | UploadStatus::Waiting => bail!("upload never finished"),
    }
}
