use super::page_factory::{PageFactory, bitmap_len, set_present};
use crate::dataset::NullBitmap;
use crate::dataset::{DataType, Value};

#[test]
fn encodes_time_bitmaps_and_values_column_major() {
    let page = PageFactory::new()
        .with_types(&[DataType::Int32, DataType::Text])
        .with_row(1, vec![Some(Value::Int32(5)), None])
        .with_row(2, vec![None, Some(Value::Text("ab".into()))])
        .create();

    assert_eq!(page.row_count(), 2);
    assert_eq!(&page.time[..8], &1i64.to_be_bytes());
    assert_eq!(&page.bitmaps[0][..], &[0b1000_0000]);
    assert_eq!(&page.bitmaps[1][..], &[0b0100_0000]);
    assert_eq!(&page.values[0][..], &[0, 0, 0, 5]);
    assert_eq!(&page.values[1][..], &[0, 0, 0, 2, b'a', b'b']);
}

#[test]
fn bitmap_spans_multiple_bytes_after_eight_rows() {
    let mut factory = PageFactory::new().with_types(&[DataType::Boolean]);
    for i in 0..9 {
        factory = factory.with_row(i, vec![Some(Value::Bool(true))]);
    }
    let page = factory.create();
    assert_eq!(&page.bitmaps[0][..], &[0xFF, 0b1000_0000]);
    assert_eq!(page.values[0].len(), 9);
}

#[test]
fn set_present_marks_high_bit_first() {
    let mut bitmap = vec![0u8; bitmap_len(10)];
    assert_eq!(bitmap.len(), 2);

    set_present(&mut bitmap, 0);
    assert_eq!(bitmap[0], 0b1000_0000);
    set_present(&mut bitmap, 7);
    assert_eq!(bitmap[0], 0b1000_0001);
    set_present(&mut bitmap, 9);
    assert_eq!(bitmap[1], 0b0100_0000);

    assert!(!NullBitmap::is_null(bitmap[1], 9));
    assert!(NullBitmap::is_null(bitmap[1], 8));
}

#[test]
fn bitmap_len_rounds_up_to_whole_bytes() {
    assert_eq!(bitmap_len(0), 0);
    assert_eq!(bitmap_len(8), 1);
    assert_eq!(bitmap_len(9), 2);
    assert_eq!(bitmap_len(1000), 125);
}
