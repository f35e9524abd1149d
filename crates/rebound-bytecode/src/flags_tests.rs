use super::flags::{GroupKind, MatchFlags, SyntaxFlags};

#[test]
fn syntax_families() {
    assert!(SyntaxFlags::NONE.is_perl());
    assert!(SyntaxFlags::ICASE.is_perl());
    assert!(!SyntaxFlags::BASIC.is_perl());
    assert!(SyntaxFlags::BASIC.is_posix());
    assert!(SyntaxFlags::EXTENDED_POSIX.is_posix());
    assert!(!SyntaxFlags::LITERAL.is_posix());
}

#[test]
fn set_operations() {
    let mut flags = MatchFlags::NOT_BOL | MatchFlags::PARTIAL;
    assert!(flags.contains(MatchFlags::NOT_BOL));
    assert!(!flags.contains(MatchFlags::NOT_BOL | MatchFlags::NOT_EOL));
    assert!(flags.intersects(MatchFlags::NOT_BOL | MatchFlags::NOT_EOL));

    flags.set(MatchFlags::NOT_BOL, false);
    assert_eq!(flags, MatchFlags::PARTIAL);
    assert_eq!(flags - MatchFlags::PARTIAL, MatchFlags::NONE);
}

#[test]
fn debug_lists_flags() {
    let flags = SyntaxFlags::ICASE | SyntaxFlags::NOSUBS;
    assert_eq!(format!("{flags:?}"), "SyntaxFlags(ICASE | NOSUBS)");
    assert_eq!(format!("{:?}", MatchFlags::NONE), "MatchFlags(NONE)");
}

#[test]
fn group_kinds() {
    assert!(GroupKind::NegLookBehind.is_assertion());
    assert!(GroupKind::NegLookBehind.is_negated());
    assert!(GroupKind::LookBehind.is_behind());
    assert!(!GroupKind::Atomic.is_assertion());
    assert_eq!(GroupKind::from_u8(GroupKind::LookAhead as u8), GroupKind::LookAhead);
}
