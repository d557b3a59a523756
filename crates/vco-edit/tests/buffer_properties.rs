//! Property tests for edit bookkeeping.

use proptest::prelude::*;
use vco_edit::{EditBuffer, EditError, MapOptions, MappingResolution};

fn text() -> impl Strategy<Value = String> {
    "[a-zé \n]{1,40}"
}

/// A text together with two offsets into it, ordered
fn text_and_range() -> impl Strategy<Value = (String, usize, usize)> {
    text().prop_flat_map(|s| {
        let len = s.chars().count();
        (Just(s), 0..=len, 0..=len).prop_map(|(s, a, b)| (s, a.min(b), a.max(b)))
    })
}

fn hires() -> MapOptions {
    MapOptions {
        hires: MappingResolution::Hires,
        ..Default::default()
    }
}

fn chars(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// With no edits the buffer renders the original and every segment
    /// points at its own position.
    #[test]
    fn test_identity(original in text()) {
        let buffer = EditBuffer::new(original.clone());
        prop_assert_eq!(buffer.to_string(), original.clone());
        prop_assert!(!buffer.has_changed());

        let decoded = buffer.generate_decoded_map(&hires());
        prop_assert_eq!(decoded.mappings.len(), original.split('\n').count());
        for (line, segments) in decoded.mappings.iter().enumerate() {
            for segment in segments {
                let position = segment.original.unwrap();
                prop_assert_eq!(position.line as usize, line);
                prop_assert_eq!(position.column, segment.generated_column);
            }
        }
    }

    #[test]
    fn test_overwrite_renders_splice(
        (original, start, end) in text_and_range(),
        replacement in "[A-Z]{0,5}",
    ) {
        prop_assume!(start < end);
        let len = original.chars().count();
        let mut buffer = EditBuffer::new(original.clone());
        buffer
            .overwrite(start as isize, end as isize, &replacement, Default::default())
            .unwrap();

        let expected = format!(
            "{}{}{}",
            chars(&original, 0, start),
            replacement,
            chars(&original, end, len)
        );
        prop_assert_eq!(buffer.to_string(), expected);
    }

    /// Insertions at distinct offsets commute
    #[test]
    fn test_insertions_commute(
        (original, a, b) in text_and_range(),
        left in any::<bool>(),
    ) {
        prop_assume!(a != b);
        let apply = |buffer: &mut EditBuffer, at: usize, text: &str| {
            if left {
                buffer.append_left(at as isize, text).unwrap();
            } else {
                buffer.append_right(at as isize, text).unwrap();
            }
        };

        let mut forward = EditBuffer::new(original.clone());
        apply(&mut forward, a, "<A>");
        apply(&mut forward, b, "<B>\n");

        let mut backward = EditBuffer::new(original);
        apply(&mut backward, b, "<B>\n");
        apply(&mut backward, a, "<A>");

        prop_assert_eq!(forward.to_string(), backward.to_string());
        prop_assert_eq!(forward.generate_map(&hires()), backward.generate_map(&hires()));
    }

    #[test]
    fn test_move_into_own_range_fails(
        (original, start, end) in text_and_range(),
        pick in 0usize..100,
    ) {
        prop_assume!(start < end);
        let index = start + pick % (end - start + 1);
        let mut buffer = EditBuffer::new(original);
        let err = buffer
            .move_range(start as isize, end as isize, index as isize)
            .unwrap_err();
        prop_assert_eq!(err, EditError::MoveInsideSelf { start, end, index });
    }

    #[test]
    fn test_trim_is_idempotent(
        (original, start, end) in text_and_range(),
        pad in "[ \n\t]{0,3}",
    ) {
        let mut buffer = EditBuffer::new(original);
        if start < end {
            buffer.remove(start as isize, end as isize).unwrap();
        }
        buffer.prepend(&pad).append(&pad);

        buffer.trim();
        let once = buffer.to_string();
        buffer.trim();
        prop_assert_eq!(buffer.to_string(), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn test_clone_is_independent(
        (original, start, end) in text_and_range(),
    ) {
        prop_assume!(start < end);
        let buffer = EditBuffer::new(original.clone());
        let map_before = buffer.generate_map(&hires());

        let mut copy = buffer.clone();
        copy.overwrite(start as isize, end as isize, "#", Default::default()).unwrap();
        copy.append_left(0, "!").unwrap();
        copy.trim();

        prop_assert_eq!(buffer.to_string(), original);
        prop_assert_eq!(buffer.generate_map(&hires()), map_before);
    }
}
