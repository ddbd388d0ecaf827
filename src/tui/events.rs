use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::tty::IsTty;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use crate::tui::models::{Event, FilterState, IntervalState, StatusMode};

/// キーボード入力ソースの種別
/// 生端末のキーキャプチャが使えない環境ではNoneになり、
/// 入力ハンドラは何も変更せずダッシュボードはCLI既定値のまま動き続ける
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputSource {
    None,
    RawTerminal,
}

impl InputSource {
    pub(crate) fn detect() -> Self {
        if std::io::stdin().is_tty() {
            Self::RawTerminal
        } else {
            Self::None
        }
    }
}

/// 生のキーイベントをEventに変換して流すハンドラ
pub(crate) struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl EventHandler {
    pub(crate) fn new(source: InputSource) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = match source {
            InputSource::None => {
                let _ = tx.send(Event::Init);
                None
            }
            InputSource::RawTerminal => Some(tokio::spawn(async move {
                let mut reader = EventStream::new();

                let _ = tx.send(Event::Init);
                loop {
                    let maybe_event = reader.next().fuse().await;
                    let result = match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => {
                            if key.code == KeyCode::Char('c')
                                && key.modifiers == KeyModifiers::CONTROL
                            {
                                tx.send(Event::Quit)
                            } else {
                                tx.send(Event::Key(key))
                            }
                        }
                        Some(Err(_)) => tx.send(Event::Error),
                        None => break,
                        _ => Ok(()),
                    };
                    if result.is_err() {
                        break;
                    }
                }
            })),
        };
        Self { rx, task }
    }

    pub(crate) async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// キーイベントをフィルタ・間隔状態への変更に変換する
/// この対応付けはキャプチャ機構から独立した契約で、変更はFilterStateのロック下でのみ行う
pub(crate) fn handle_key_event(filter: &FilterState, interval: &IntervalState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Esc => filter.clear_query(),
        KeyCode::Backspace => filter.pop_char(),
        KeyCode::Left => filter.prev_page(),
        KeyCode::Right => filter.next_page(),
        KeyCode::Home => filter.first_page(),
        KeyCode::End => filter.last_page(),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            // u/d/a/iはコマンドとして予約されており、テキストフィルタには入力できない
            'u' => filter.set_mode(StatusMode::Up),
            'd' => filter.set_mode(StatusMode::Down),
            'a' => filter.set_mode(StatusMode::All),
            'i' => interval.cycle_next(),
            _ if !c.is_control() => filter.push_char(c),
            _ => {}
        },
        _ => {}
    }
}
