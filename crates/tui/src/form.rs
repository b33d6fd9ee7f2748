use std::path::PathBuf;

use gamezone_core::NewGameDraft;

const MAX_FIELD_LEN: usize = 512;

/// Single-line text input with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.value.chars().count() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.value.chars().count() >= MAX_FIELD_LEN {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

/// Fields of the add dialog, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Genre,
    Rating,
    ReleaseDate,
    ImageUrl,
    ImageFile,
    Trailer,
    Description,
}

impl Field {
    pub const ORDER: [Field; 8] = [
        Field::Title,
        Field::Genre,
        Field::Rating,
        Field::ReleaseDate,
        Field::ImageUrl,
        Field::ImageFile,
        Field::Trailer,
        Field::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Genre => "Genre",
            Field::Rating => "Rating (0-10)",
            Field::ReleaseDate => "Release date",
            Field::ImageUrl => "Image URL",
            Field::ImageFile => "Image file",
            Field::Trailer => "Trailer URL",
            Field::Description => "Description",
        }
    }
}

/// Editable copy of the draft shown in the add dialog.
#[derive(Debug, Clone)]
pub struct GameForm {
    inputs: Vec<TextInput>,
    focus: usize,
}

impl GameForm {
    pub fn from_draft(draft: &NewGameDraft) -> Self {
        let inputs = Field::ORDER
            .iter()
            .map(|field| {
                TextInput::new(match field {
                    Field::Title => draft.title.clone(),
                    Field::Genre => draft.genre.clone(),
                    Field::Rating => format_rating(draft.rating),
                    Field::ReleaseDate => draft.release_date.clone(),
                    Field::ImageUrl => draft.image.clone(),
                    Field::ImageFile => draft
                        .image_file
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default(),
                    Field::Trailer => draft.trailer.clone(),
                    Field::Description => draft.description.clone(),
                })
            })
            .collect();
        Self { inputs, focus: 0 }
    }

    pub fn focus(&self) -> Field {
        Field::ORDER[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ORDER.len() - 1) % Field::ORDER.len();
    }

    pub fn input(&self, field: Field) -> &TextInput {
        &self.inputs[Self::position(field)]
    }

    pub fn focused_mut(&mut self) -> &mut TextInput {
        &mut self.inputs[self.focus]
    }

    /// Copy the form into `draft`. Fails only when the rating is not a number.
    pub fn apply_to(&self, draft: &mut NewGameDraft) -> Result<(), String> {
        let rating_text = self.input(Field::Rating).value().trim();
        let rating = if rating_text.is_empty() {
            0.0
        } else {
            rating_text
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| format!("Rating must be a number, got \"{rating_text}\""))?
        };

        draft.title = self.input(Field::Title).value().to_string();
        draft.genre = self.input(Field::Genre).value().to_string();
        draft.rating = rating;
        draft.release_date = self.input(Field::ReleaseDate).value().to_string();
        draft.image = self.input(Field::ImageUrl).value().to_string();
        let image_file = self.input(Field::ImageFile).value().trim();
        draft.image_file = (!image_file.is_empty()).then(|| PathBuf::from(image_file));
        draft.trailer = self.input(Field::Trailer).value().to_string();
        draft.description = self.input(Field::Description).value().to_string();
        Ok(())
    }

    fn position(field: Field) -> usize {
        Field::ORDER
            .iter()
            .position(|candidate| *candidate == field)
            .unwrap_or(0)
    }
}

fn format_rating(rating: f64) -> String {
    if rating == 0.0 {
        String::new()
    } else {
        rating.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::new("Drgon");
        input.move_cursor(-3);
        input.insert('a');
        assert_eq!(input.value(), "Dragon");
        input.move_end();
        input.backspace();
        assert_eq!(input.value(), "Drago");
        input.move_home();
        input.delete();
        assert_eq!(input.value(), "rago");
        input.move_cursor(-10);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn text_input_handles_multibyte_characters() {
        let mut input = TextInput::new("Игра");
        input.backspace();
        input.insert('ы');
        assert_eq!(input.value(), "Игры");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn form_round_trips_into_draft() {
        let mut form = GameForm::from_draft(&NewGameDraft::default());
        form.focused_mut().insert('Q');
        form.focus_next();
        form.focused_mut().insert('P');
        form.focus_next();
        for ch in "8,5".chars() {
            form.focused_mut().insert(ch);
        }
        for _ in 0..3 {
            form.focus_next();
        }
        assert_eq!(form.focus(), Field::ImageFile);
        for ch in "cover.png".chars() {
            form.focused_mut().insert(ch);
        }

        let mut draft = NewGameDraft::default();
        form.apply_to(&mut draft).expect("valid rating");
        assert_eq!(draft.title, "Q");
        assert_eq!(draft.genre, "P");
        assert_eq!(draft.rating, 8.5);
        assert_eq!(draft.image_file, Some(PathBuf::from("cover.png")));
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let mut form = GameForm::from_draft(&NewGameDraft::default());
        form.focus_next();
        form.focus_next();
        form.focused_mut().insert('x');
        let mut draft = NewGameDraft::default();
        assert!(form.apply_to(&mut draft).is_err());
        assert_eq!(draft, NewGameDraft::default());
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut form = GameForm::from_draft(&NewGameDraft::default());
        form.focus_prev();
        assert_eq!(form.focus(), Field::Description);
    }
}
