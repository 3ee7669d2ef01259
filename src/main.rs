use colloquy::chat_view::draw_chat;
use colloquy::client::run_discussion_turn;
use colloquy::config::{get_config, initialize_config};
use colloquy::errors::ColloquyResult;
use colloquy::App;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flexi_logger::{FileSpec, Logger};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> ColloquyResult<()> {
    initialize_config()?;
    let config = get_config();

    // Log to a file so the alternate screen stays clean.
    let _logger = Logger::try_with_str(&config.log_level)?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("colloquy"),
        )
        .start()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = Arc::new(Mutex::new(App::new()));
    let result = run_event_loop(&mut terminal, app, config.endpoint).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
    endpoint: String,
) -> ColloquyResult<()> {
    loop {
        {
            let mut guard = app.lock().await;
            terminal.draw(|f| draw_chat(f, &mut *guard))?;
            if guard.should_quit {
                return Ok(());
            }
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        if let CEvent::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let mut guard = app.lock().await;
            match key.code {
                KeyCode::Esc => guard.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    guard.should_quit = true;
                }
                KeyCode::Enter => {
                    if let Some(question) = guard.submit() {
                        log::info!("Submitting question: {}", question);
                        guard.logs.add("質問を送信しました");
                        tokio::spawn(run_discussion_turn(
                            app.clone(),
                            endpoint.clone(),
                            question,
                        ));
                    }
                }
                KeyCode::Backspace => {
                    guard.input.pop();
                }
                KeyCode::Up => guard.scroll_up(),
                KeyCode::Down => guard.scroll_down(),
                KeyCode::Char(c) => guard.input.push(c),
                _ => {}
            }
        }
    }
}
