use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, mouse_area, row, text, Row};
use iced::{Alignment, Border, Color, ContentFit, Element, Length, Theme};

use photo_intake::accept::AcceptFilter;
use photo_intake::config::FieldConfig;
use photo_intake::intake::data_uri::DataUri;
use photo_intake::intake::{
    BatchStart, IntakeError, IntakeSurface, RawFile, UploadItem, UploadSet,
};

use crate::Message;

/// Thumbnail edge length in logical pixels
const THUMB_SIZE: f32 = 80.0;

const DESTRUCTIVE: Color = Color::from_rgb(0.86, 0.24, 0.24);

/// One upload field: its config, intake state and the uploads it owns
pub struct Field {
    pub config: FieldConfig,
    pub accept: AcceptFilter,
    pub surface: IntakeSurface,
    uploads: UploadSet,
    /// Decoded thumbnails, parallel to `uploads`
    previews: Vec<Option<Handle>>,
}

impl Field {
    pub fn new(config: FieldConfig) -> Self {
        let accept = AcceptFilter::parse(&config.accept);
        let surface = IntakeSurface::new(config.limits());
        Self {
            config,
            accept,
            surface,
            uploads: UploadSet::new(),
            previews: Vec::new(),
        }
    }

    pub fn uploads(&self) -> &UploadSet {
        &self.uploads
    }

    /// Start a batch against this field's current uploads
    pub fn begin(&mut self, files: Vec<RawFile>) -> BatchStart {
        self.surface.begin(files, &self.uploads)
    }

    /// Apply a finished batch
    pub fn complete(&mut self, result: Result<Vec<UploadItem>, IntakeError>) {
        let mut replacement = None;
        self.surface
            .complete(result, &self.uploads, |set| replacement = Some(set));
        if let Some(set) = replacement {
            self.replace_uploads(set);
        }
    }

    pub fn remove(&mut self, index: usize) {
        let mut replacement = None;
        self.surface
            .remove(index, &self.uploads, |set| replacement = Some(set));
        if let Some(set) = replacement {
            self.replace_uploads(set);
        }
    }

    /// Swap in a new upload set and rebuild the thumbnails
    fn replace_uploads(&mut self, uploads: UploadSet) {
        self.previews = uploads.iter().map(preview_handle).collect();
        self.uploads = uploads;
    }

    /// Required fields need at least one upload
    pub fn is_satisfied(&self) -> bool {
        !self.config.required || !self.uploads.is_empty()
    }

    pub fn view(&self, index: usize) -> Element<'_, Message> {
        let busy = self.surface.is_busy();

        let mut heading = row![text(&self.config.label).size(18)].spacing(4);
        if self.config.required {
            heading = heading.push(text("*").size(18).color(DESTRUCTIVE));
        }

        let mut content = column![heading, text(&self.config.description).size(13)].spacing(8);

        if let Some(error) = self.surface.error() {
            content = content.push(
                container(text(error.to_string()).size(13).color(DESTRUCTIVE))
                    .padding([6, 10])
                    .width(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        content = content.push(self.drop_zone(index, busy));

        if !self.uploads.is_empty() {
            let tiles = self
                .uploads
                .iter()
                .zip(&self.previews)
                .enumerate()
                .map(|(i, (item, preview))| thumbnail(index, i, item, preview.as_ref(), busy));
            content = content.push(Row::with_children(tiles).spacing(8).wrap());
        }

        container(content)
            .padding(20)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }

    fn drop_zone(&self, index: usize, busy: bool) -> Element<'_, Message> {
        let dragging = self.surface.is_dragging();
        let noun = if self.config.accept.starts_with("image/") {
            "photos"
        } else {
            "files"
        };

        let prompt = if busy {
            column![text("Reading files...").size(14)]
        } else {
            column![
                text(format!(
                    "Select {} (camera/gallery, up to {})",
                    noun, self.config.max_files
                ))
                .size(14),
                text("Click or drag to upload").size(12),
            ]
        };

        let picker = button(prompt.spacing(4).align_x(Alignment::Center))
            .on_press_maybe((!busy).then_some(Message::PickFiles(index)))
            .padding([24, 16])
            .width(Length::Fill)
            .style(button::text);

        let zone = container(picker)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .style(move |theme: &Theme| drop_zone_style(theme, dragging));

        mouse_area(zone).on_enter(Message::HoverField(index)).into()
    }
}

fn drop_zone_style(theme: &Theme, dragging: bool) -> container::Style {
    let palette = theme.extended_palette();
    let border_color = if dragging {
        palette.primary.strong.color
    } else {
        palette.background.strong.color
    };

    container::Style {
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 8.0.into(),
        },
        background: dragging.then(|| palette.primary.weak.color.into()),
        ..container::Style::default()
    }
}

fn thumbnail<'a>(
    field: usize,
    index: usize,
    item: &'a UploadItem,
    preview: Option<&Handle>,
    busy: bool,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .width(THUMB_SIZE)
            .height(THUMB_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("FILE").size(12))
            .center(THUMB_SIZE)
            .style(container::bordered_box)
            .into(),
    };

    let remove = button(text("Remove").size(11))
        .on_press_maybe((!busy).then_some(Message::RemoveFile(field, index)))
        .padding([2, 6])
        .style(button::danger);

    column![picture, text(item.name()).size(11), remove]
        .spacing(4)
        .width(THUMB_SIZE)
        .align_x(Alignment::Center)
        .into()
}

/// Decode an item's preview data URI for display
fn preview_handle(item: &UploadItem) -> Option<Handle> {
    let preview = item.preview_data()?;
    match DataUri::parse(preview).and_then(|uri| uri.decode()) {
        Ok(bytes) => Some(Handle::from_bytes(bytes)),
        Err(e) => {
            tracing::warn!(file = item.name(), error = %e, "could not decode preview");
            None
        }
    }
}
