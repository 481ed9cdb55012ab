use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input, please enter a valid number from the list.")]
    NotANumber,

    #[error("Invalid input, please enter a number between 1 and {max}.")]
    OutOfRange { max: usize },

    #[error("There are no projects to choose from.")]
    Empty,
}

/// Parse a 1-based choice among `count` entries into a 0-based index.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    if count == 0 {
        return Err(SelectionError::Empty);
    }

    let choice: i64 = input
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber)?;

    if choice < 1 || choice as u64 > count as u64 {
        return Err(SelectionError::OutOfRange { max: count });
    }
    Ok(choice as usize - 1)
}

/// Ask until a valid choice is entered. Returns `None` when input ends.
pub fn prompt_selection<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    count: usize,
) -> io::Result<Option<usize>> {
    if count == 0 {
        return Ok(None);
    }

    let mut line = String::new();
    loop {
        line.clear();

        write!(
            output,
            "\nPlease enter the number of the project you want to copy: "
        )?;
        output.flush()?;

        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_selection(&line, count) {
            Ok(index) => return Ok(Some(index)),
            Err(err) => writeln!(output, "[Error] {}", err)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_selection_bounds() {
        assert_eq!(parse_selection("1", 3), Ok(0));
        assert_eq!(parse_selection(" 3\n", 3), Ok(2));
        assert_eq!(
            parse_selection("0", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
        assert_eq!(
            parse_selection("4", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
        assert_eq!(
            parse_selection("-2", 3),
            Err(SelectionError::OutOfRange { max: 3 })
        );
        assert_eq!(parse_selection("two", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("1", 0), Err(SelectionError::Empty));
    }

    #[test]
    fn test_prompt_repeats_until_valid() {
        let input = Cursor::new("abc\n0\n9\n2\n");
        let mut output = Vec::new();

        let choice = prompt_selection(input, &mut output, 3).unwrap();
        assert_eq!(choice, Some(1));

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Please enter the number").count(), 4);
        assert_eq!(text.matches("valid number from the list").count(), 1);
        assert_eq!(text.matches("between 1 and 3").count(), 2);
    }

    #[test]
    fn test_prompt_end_of_input_cancels() {
        let mut output = Vec::new();
        assert_eq!(prompt_selection(Cursor::new(""), &mut output, 2).unwrap(), None);
        assert_eq!(
            prompt_selection(Cursor::new("x\n"), &mut output, 2).unwrap(),
            None
        );
    }
}
