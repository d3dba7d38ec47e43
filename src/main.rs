use iced::event::{self, Event};
use iced::widget::{button, column, container, scrollable, text, Column};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

use photo_intake::config::FormConfig;
use photo_intake::intake::{self, BatchStart, IntakeError, RawFile, UploadItem};

// Declare the ui module
mod ui;

use ui::Field;

/// How long to wait after the first dropped file for the rest of the drop
const DROP_SETTLE: Duration = Duration::from_millis(80);

/// Main application state
struct PhotoIntake {
    /// Form heading
    title: String,
    /// One entry per configured upload field
    fields: Vec<Field>,
    /// Field that receives dropped files (the one the cursor last entered)
    drop_target: usize,
    /// Paths from the drop in progress, flushed as one batch
    pending_drop: Vec<PathBuf>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked a field's picker
    PickFiles(usize),
    /// Picked or dropped paths were described
    FilesCollected(usize, Result<Vec<RawFile>, IntakeError>),
    /// Background encoding of a batch finished
    BatchDecoded(usize, Result<Vec<UploadItem>, IntakeError>),
    /// Remove (field, item)
    RemoveFile(usize, usize),
    /// Cursor entered a field's drop zone
    HoverField(usize),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    /// The drop settle timer fired
    DropSettled,
    /// User clicked "Submit"
    Submit,
}

impl PhotoIntake {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, status) = match FormConfig::load() {
            Ok(config) => (config, "Ready.".to_string()),
            Err(e) => {
                tracing::error!(error = %e, "falling back to built-in form");
                (FormConfig::default(), format!("Using built-in form: {}", e))
            }
        };

        let fields: Vec<Field> = config.fields.into_iter().map(Field::new).collect();
        tracing::info!(fields = fields.len(), "form initialized");

        (
            PhotoIntake {
                title: config.title,
                fields,
                drop_target: 0,
                pending_drop: Vec::new(),
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles(index) => {
                let Some(field) = self.fields.get(index) else {
                    return Task::none();
                };
                if field.surface.is_busy() {
                    return Task::none();
                }

                // Show the native file picker dialog
                let mut dialog =
                    FileDialog::new().set_title(format!("Select files for {}", field.config.label));
                let extensions = field.accept.extensions();
                if !extensions.is_empty() {
                    dialog = dialog.add_filter(field.accept.label(), extensions.as_slice());
                }

                let paths = if field.surface.allows_multiple() {
                    dialog.pick_files().unwrap_or_default()
                } else {
                    dialog.pick_file().into_iter().collect()
                };

                self.intake_paths(index, paths)
            }
            Message::FilesCollected(index, result) => {
                let Some(field) = self.fields.get_mut(index) else {
                    return Task::none();
                };

                let files = match result {
                    Ok(files) => files,
                    Err(e) => {
                        field.surface.fail(e);
                        return Task::none();
                    }
                };

                match field.begin(files) {
                    BatchStart::Decode(files) => {
                        self.status = format!("Reading {} file(s)...", files.len());
                        Task::perform(intake::decode_batch(files), move |result| {
                            Message::BatchDecoded(index, result)
                        })
                    }
                    BatchStart::Busy | BatchStart::Rejected | BatchStart::Nothing => Task::none(),
                }
            }
            Message::BatchDecoded(index, result) => {
                let Some(field) = self.fields.get_mut(index) else {
                    return Task::none();
                };

                field.complete(result);
                self.status = self.summary();
                Task::none()
            }
            Message::RemoveFile(index, item) => {
                if let Some(field) = self.fields.get_mut(index) {
                    field.remove(item);
                }
                self.status = self.summary();
                Task::none()
            }
            Message::HoverField(index) => {
                if index < self.fields.len() {
                    self.drop_target = index;
                }
                Task::none()
            }
            Message::FileHovered => {
                if let Some(field) = self.fields.get_mut(self.drop_target) {
                    field.surface.set_dragging(true);
                }
                Task::none()
            }
            Message::FilesHoveredLeft => {
                for field in &mut self.fields {
                    field.surface.set_dragging(false);
                }
                Task::none()
            }
            Message::FileDropped(path) => {
                for field in &mut self.fields {
                    field.surface.set_dragging(false);
                }

                // Each dropped file is its own event; gather them into one batch
                self.pending_drop.push(path);
                if self.pending_drop.len() == 1 {
                    return Task::perform(tokio::time::sleep(DROP_SETTLE), |_| {
                        Message::DropSettled
                    });
                }
                Task::none()
            }
            Message::DropSettled => {
                let paths = std::mem::take(&mut self.pending_drop);
                self.intake_paths(self.drop_target, paths)
            }
            Message::Submit => {
                if !self.fields.iter().all(Field::is_satisfied) {
                    self.status = "Please add files to every required field.".to_string();
                    return Task::none();
                }

                match self.submission_payload() {
                    Ok(payload) => {
                        // Forwarding to a backend is the host application's job
                        tracing::info!(bytes = payload.len(), "submission payload prepared");
                        self.status = format!("Ready to submit ({} KB).", payload.len() / 1024);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "could not serialize submission");
                        self.status = "Could not prepare the submission.".to_string();
                    }
                }
                Task::none()
            }
        }
    }

    /// Truncate to the field's free slots and describe the paths in the background
    ///
    /// The field stays busy from here until `FilesCollected` is handled.
    fn intake_paths(&mut self, index: usize, mut paths: Vec<PathBuf>) -> Task<Message> {
        let Some(field) = self.fields.get_mut(index) else {
            return Task::none();
        };
        if field.surface.is_busy() {
            return Task::none();
        }

        paths.truncate(field.surface.limits().remaining(field.uploads()));
        if paths.is_empty() || !field.surface.reserve() {
            return Task::none();
        }

        Task::perform(intake::collect_raw_files(paths), move |result| {
            Message::FilesCollected(index, result)
        })
    }

    /// JSON object of field id -> uploads
    fn submission_payload(&self) -> Result<String, serde_json::Error> {
        let mut payload = serde_json::Map::new();
        for field in &self.fields {
            payload.insert(field.config.id.clone(), serde_json::to_value(field.uploads())?);
        }
        serde_json::to_string(&payload)
    }

    fn summary(&self) -> String {
        let total: usize = self.fields.iter().map(|f| f.uploads().len()).sum();
        format!("{} file(s) attached.", total)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![text(&self.title).size(32)]
            .spacing(20)
            .padding(40)
            .max_width(720.0);

        for (index, field) in self.fields.iter().enumerate() {
            content = content.push(field.view(index));
        }

        content = content.push(
            column![
                button("Submit").on_press(Message::Submit).padding(10),
                text(&self.status).size(14),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        );

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .into()
    }

    /// Listen for files dragged over or dropped on the window
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn setup_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("failed to install tracing subscriber: {}", e);
    }
}

fn main() -> iced::Result {
    setup_tracing();

    iced::application("Photo Intake", PhotoIntake::update, PhotoIntake::view)
        .subscription(PhotoIntake::subscription)
        .theme(PhotoIntake::theme)
        .centered()
        .run_with(PhotoIntake::new)
}
