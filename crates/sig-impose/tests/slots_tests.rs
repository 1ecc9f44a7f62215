use sig_impose::*;
use std::collections::HashSet;

const SIGNATURES: [usize; 5] = [4, 8, 12, 16, 32];

fn sig(pages: usize) -> SignatureSize {
    SignatureSize::try_from(pages).unwrap()
}

#[test]
fn test_padded_length_is_whole_signatures() {
    for signature in SIGNATURES {
        for page_count in 0..70 {
            let slots = compute_slots(page_count, Some(sig(signature)));
            assert_eq!(slots.len() % signature, 0);
            assert!(slots.len() >= page_count);
            assert!(slots.len() - page_count < signature);
        }
    }
}

#[test]
fn test_every_page_appears_exactly_once() {
    for signature in SIGNATURES {
        for page_count in 0..70 {
            let slots = compute_slots(page_count, Some(sig(signature)));
            let pages: Vec<usize> = slots.iter().filter_map(|slot| slot.page()).collect();
            let unique: HashSet<usize> = pages.iter().copied().collect();

            assert_eq!(pages.len(), page_count, "sig {} pages {}", signature, page_count);
            assert_eq!(unique, (0..page_count).collect::<HashSet<_>>());
        }
    }
}

#[test]
fn test_blanks_only_in_final_signature() {
    for signature in SIGNATURES {
        for page_count in 1..70 {
            let slots = compute_slots(page_count, Some(sig(signature)));
            assert_eq!(slots.blank_count(), slots.len() - page_count);

            let final_signature_start = slots.len() - signature;
            for (position, slot) in slots.iter().enumerate() {
                if slot.is_blank() {
                    assert!(position >= final_signature_start);
                }
            }
        }
    }
}

#[test]
fn test_compute_slots_is_idempotent() {
    let first = compute_slots(37, Some(sig(8)));
    let second = compute_slots(37, Some(sig(8)));
    assert_eq!(first, second);
}

#[test]
fn test_invalid_signatures_rejected() {
    for bad in [0, -4, 5, 6, 10] {
        match impose_slots(12, Some(bad)) {
            Err(ImposeError::InvalidSignature(value)) => assert_eq!(value, bad),
            other => panic!("Expected InvalidSignature for {}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_negative_page_count_rejected() {
    assert!(matches!(
        impose_slots(-1, Some(4)),
        Err(ImposeError::InvalidPageCount(-1))
    ));
}

#[test]
fn test_signature_checked_before_page_count() {
    assert!(matches!(
        impose_slots(-1, Some(3)),
        Err(ImposeError::InvalidSignature(3))
    ));
}

#[test]
fn test_single_sheet_order() {
    let slots = impose_slots(4, Some(4)).unwrap();
    assert_eq!(
        slots.as_slice(),
        &[Slot::Page(3), Slot::Page(0), Slot::Page(1), Slot::Page(2)]
    );
}

#[test]
fn test_second_signature_padding() {
    // 6 pages in folios: the second signature holds pages 5 and 6
    let slots = impose_slots(6, Some(4)).unwrap();
    assert_eq!(slots.padded_count(), 8);
    assert_eq!(
        slots.as_slice(),
        &[
            Slot::Page(3),
            Slot::Page(0),
            Slot::Page(1),
            Slot::Page(2),
            Slot::Blank,
            Slot::Page(4),
            Slot::Page(5),
            Slot::Blank,
        ]
    );
}

#[test]
fn test_empty_document() {
    let slots = impose_slots(0, None).unwrap();
    assert!(slots.is_empty());
    assert_eq!(slots.padded_count(), 0);
    assert_eq!(slots.blank_count(), 0);
}

#[test]
fn test_default_signature_covers_document() {
    let slots = impose_slots(10, None).unwrap();
    assert_eq!(slots.signature().pages(), 12);
    assert_eq!(slots.padded_count(), 12);
    assert_eq!(slots.signatures().count(), 1);
}

#[test]
fn test_sheet_and_signature_grouping() {
    let slots = compute_slots(20, Some(sig(8)));
    assert_eq!(slots.len(), 24);
    assert_eq!(slots.signatures().count(), 3);
    assert_eq!(slots.sheets().count(), 6);
    assert!(slots.sheets().all(|sheet| sheet.len() == 4));
}

#[test]
fn test_padded_count() {
    assert_eq!(padded_count(0, sig(8)), 0);
    assert_eq!(padded_count(1, sig(8)), 8);
    assert_eq!(padded_count(16, sig(8)), 16);
    assert_eq!(padded_count(17, sig(16)), 32);
}
