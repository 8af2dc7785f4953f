//! Iced application around the search widget
//!
//! Translates window, keyboard and pointer events into widget inputs and
//! carries out the effects the widget asks for: timers become abortable
//! sleep tasks, fetches become tasks on the source client, and activated
//! rows are handed to the desktop's URL handler.

use std::collections::HashMap;
use std::sync::Arc;

use iced::event::{self, Event};
use iced::widget::{column, container, mouse_area, text_input};
use iced::{keyboard, mouse, task, window};
use iced::{Background, Border, Element, Length, Subscription, Task, Theme};

use crate::backend::api::SourceClient;
use crate::backend::types::SearchResult;
use crate::backend::FetchError;
use crate::ui::{dropdown, search_bar, theme};
use crate::widget::{Effect, Input, Key, RequestId, SearchWidget, TimerId, Timings};

pub struct SearchBox {
    widget: SearchWidget,
    client: SourceClient,
    /// Raw input text as typed
    value: String,
    timers: HashMap<TimerId, task::Handle>,
    pointer_inside: bool,
    pointer_over_input: bool,
    /// Set by Escape until the input is pressed again; typing is ignored
    /// meanwhile
    input_released: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Submit,
    InputEntered,
    InputLeft,
    PointerEntered,
    PointerLeft,
    PointerPressed,
    RowHovered(usize),
    RowClicked(usize),
    KeyPressed(Key),
    TimerFired(TimerId),
    FetchFinished {
        request: RequestId,
        outcome: Result<Vec<SearchResult>, Arc<FetchError>>,
    },
    WindowFocused,
    WindowFocusLost,
    WindowClosed,
}

impl SearchBox {
    pub fn new(client: SourceClient, timings: Timings) -> (Self, Task<Message>) {
        tracing::info!("Search box reading from {}", client.source());
        let app = Self {
            widget: SearchWidget::new(timings),
            client,
            value: String::new(),
            timers: HashMap::new(),
            pointer_inside: false,
            pointer_over_input: false,
            input_released: false,
        };
        (app, text_input::focus(search_bar::input_id()))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::InputChanged(value) => {
                if self.input_released {
                    return Task::none();
                }
                self.value = value;
                self.dispatch(Input::TextChanged(self.value.clone()))
            }

            Message::Submit => self.dispatch(Input::Key(Key::Enter)),

            Message::InputEntered => {
                self.pointer_over_input = true;
                Task::none()
            }

            Message::InputLeft => {
                self.pointer_over_input = false;
                Task::none()
            }

            Message::PointerEntered => {
                self.pointer_inside = true;
                Task::none()
            }

            Message::PointerLeft => {
                self.pointer_inside = false;
                Task::none()
            }

            // Seen even when the text input captures the press
            Message::PointerPressed => {
                if self.pointer_over_input {
                    self.press_input()
                } else if self.pointer_inside {
                    Task::none()
                } else {
                    self.dispatch(Input::OutsideClick)
                }
            }

            Message::RowHovered(index) => self.dispatch(Input::RowHovered(index)),

            Message::RowClicked(index) => self.dispatch(Input::RowClicked(index)),

            Message::KeyPressed(key) => self.dispatch(Input::Key(key)),

            Message::TimerFired(id) => {
                self.timers.remove(&id);
                self.dispatch(Input::TimerFired(id))
            }

            Message::FetchFinished { request, outcome } => {
                self.dispatch(Input::FetchCompleted { request, outcome })
            }

            Message::WindowFocused => {
                if self.input_released || self.widget.is_focused() {
                    Task::none()
                } else {
                    self.dispatch(Input::Focused)
                }
            }

            Message::WindowFocusLost => {
                if self.widget.is_focused() {
                    self.dispatch(Input::Blurred)
                } else {
                    Task::none()
                }
            }

            Message::WindowClosed => {
                let effects = self.widget.teardown();
                self.run(effects)
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = column![search_bar::view(&self.value)].spacing(8);

        if self.widget.is_dropdown_visible() {
            content = content.push(dropdown::view(self.widget.panel(), self.widget.selection()));
        }

        let boundary = mouse_area(content)
            .on_enter(Message::PointerEntered)
            .on_exit(Message::PointerLeft);

        container(boundary)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Background::Color(theme::BACKGROUND)),
                border: Border {
                    color: theme::BORDER,
                    width: 1.0,
                    radius: 16.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(named),
                ..
            }) => match named {
                keyboard::key::Named::ArrowDown => Some(Message::KeyPressed(Key::ArrowDown)),
                keyboard::key::Named::ArrowUp => Some(Message::KeyPressed(Key::ArrowUp)),
                keyboard::key::Named::Escape => Some(Message::KeyPressed(Key::Escape)),
                _ => None,
            },
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                Some(Message::PointerPressed)
            }
            Event::Window(window::Event::Focused) => Some(Message::WindowFocused),
            Event::Window(window::Event::Unfocused) => Some(Message::WindowFocusLost),
            Event::Window(window::Event::Closed) => Some(Message::WindowClosed),
            _ => None,
        })
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn press_input(&mut self) -> Task<Message> {
        self.input_released = false;
        let refocus = text_input::focus(search_bar::input_id());
        if self.widget.is_focused() {
            refocus
        } else {
            Task::batch([self.dispatch(Input::Focused), refocus])
        }
    }

    fn dispatch(&mut self, input: Input) -> Task<Message> {
        let effects = self.widget.handle(input);
        self.run(effects)
    }

    fn run(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let tasks: Vec<Task<Message>> = effects
            .into_iter()
            .map(|effect| self.execute(effect))
            .collect();
        Task::batch(tasks)
    }

    fn execute(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::StartTimer { id, delay } => {
                let (timer, handle) = Task::perform(
                    async move { tokio::time::sleep(delay).await },
                    move |_| Message::TimerFired(id),
                )
                .abortable();
                self.timers.insert(id, handle);
                timer
            }

            Effect::CancelTimer(id) => {
                if let Some(handle) = self.timers.remove(&id) {
                    handle.abort();
                }
                Task::none()
            }

            Effect::Fetch { request, query } => {
                tracing::debug!("Fetching {} for {:?}", self.client.source(), query);
                let client = self.client.clone();
                Task::perform(
                    async move { client.fetch_matches().await.map_err(Arc::new) },
                    move |outcome| Message::FetchFinished { request, outcome },
                )
            }

            Effect::OpenUrl(raw) => {
                match self.client.resolve_link(&raw) {
                    Some(url) => {
                        if let Err(e) = open::that_detached(url.as_str()) {
                            tracing::error!("Failed to open {}: {}", url, e);
                        }
                    }
                    None => tracing::warn!("Refusing to open {:?}", raw),
                }
                Task::none()
            }

            Effect::ReleaseFocus => {
                self.input_released = true;
                Task::none()
            }
        }
    }
}
