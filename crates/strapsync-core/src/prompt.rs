// ── Operator choices ──
//
// The engine asks questions through `Chooser`; the caller owns the
// terminal and the retry loop. Nothing here ends the process.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::{CoreError, InvalidSelection};

/// Something that picks one of several labelled options.
pub trait Chooser: Send {
    /// Present `options` under `prompt` and return a zero-based index.
    ///
    /// Implementations re-prompt on invalid input; an error means the
    /// operator cannot or will not answer.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, CoreError>;
}

/// Parse a one-based menu answer into a zero-based index.
pub fn parse_choice(input: &str, len: usize) -> Result<usize, InvalidSelection> {
    if len == 0 {
        return Err(InvalidSelection::NoOptions);
    }
    let trimmed = input.trim();
    let choice: usize = trimmed.parse().map_err(|_| InvalidSelection::NotANumber {
        input: trimmed.to_string(),
    })?;
    if (1..=len).contains(&choice) {
        Ok(choice - 1)
    } else {
        Err(InvalidSelection::OutOfRange { choice, len })
    }
}

/// Ask `chooser` to pick one of `items`, labelled by `label`.
pub fn choose_item<'a, T>(
    chooser: &mut dyn Chooser,
    prompt: &str,
    items: &'a [T],
    label: impl Fn(usize, &T) -> String,
) -> Result<&'a T, CoreError> {
    if items.is_empty() {
        return Err(InvalidSelection::NoOptions.into());
    }
    let labels: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| label(i, item))
        .collect();
    let index = chooser.choose(prompt, &labels)?;
    items.get(index).ok_or_else(|| {
        InvalidSelection::OutOfRange {
            choice: index + 1,
            len: items.len(),
        }
        .into()
    })
}

/// Answer to a same-named file already present at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum CollisionChoice {
    #[strum(to_string = "Use existing asset (this one only)")]
    ReuseOnce,
    #[strum(to_string = "Use existing asset (always)")]
    ReuseAlways,
    #[strum(to_string = "Overwrite with new asset")]
    Overwrite,
}

impl CollisionChoice {
    pub fn labels() -> Vec<String> {
        Self::iter().map(|choice| choice.to_string()).collect()
    }

    pub fn ask(chooser: &mut dyn Chooser, file_name: &str) -> Result<Self, CoreError> {
        let options: Vec<Self> = Self::iter().collect();
        let prompt = format!("Asset \"{file_name}\" already exists in the destination");
        choose_item(chooser, &prompt, &options, |_, choice| choice.to_string()).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl Chooser for Fixed {
        fn choose(&mut self, _prompt: &str, _options: &[String]) -> Result<usize, CoreError> {
            Ok(self.0)
        }
    }

    #[test]
    fn parse_choice_is_one_based() {
        assert_eq!(parse_choice("1", 3), Ok(0));
        assert_eq!(parse_choice(" 3\n", 3), Ok(2));
    }

    #[test]
    fn parse_choice_rejects_bad_input() {
        assert_eq!(
            parse_choice("abc", 3),
            Err(InvalidSelection::NotANumber {
                input: "abc".into()
            })
        );
        assert_eq!(
            parse_choice("0", 3),
            Err(InvalidSelection::OutOfRange { choice: 0, len: 3 })
        );
        assert_eq!(
            parse_choice("4", 3),
            Err(InvalidSelection::OutOfRange { choice: 4, len: 3 })
        );
        assert!(parse_choice("-1", 3).is_err());
        assert_eq!(parse_choice("1", 0), Err(InvalidSelection::NoOptions));
    }

    #[test]
    fn choose_item_maps_index_and_rejects_empty() {
        let items = ["a", "b", "c"];
        let picked = choose_item(&mut Fixed(1), "pick", &items, |_, s| (*s).to_string()).unwrap();
        assert_eq!(*picked, "b");

        let empty: [&str; 0] = [];
        let err = choose_item(&mut Fixed(0), "pick", &empty, |_, s| (*s).to_string());
        assert!(matches!(
            err,
            Err(CoreError::InvalidSelection(InvalidSelection::NoOptions))
        ));

        let out_of_range = choose_item(&mut Fixed(9), "pick", &items, |_, s| (*s).to_string());
        assert!(out_of_range.is_err());
    }

    #[test]
    fn collision_labels_in_menu_order() {
        assert_eq!(CollisionChoice::labels().len(), 3);
        assert_eq!(
            CollisionChoice::ask(&mut Fixed(2), "hero.png").unwrap(),
            CollisionChoice::Overwrite
        );
    }
}
