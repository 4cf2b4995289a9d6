use super::*;

#[test]
fn test_enter_and_leave_follow_stack_discipline() {
    let mut ctx = ResolutionContext::new(5);
    assert!(ctx.enter("A").is_entered());
    assert!(ctx.enter("B").is_entered());
    assert_eq!(ctx.path().collect::<Vec<_>>(), vec!["A", "B"]);

    ctx.leave("B");
    assert!(!ctx.is_visiting("B"));
    // B may recur on an independent branch once its frame closed.
    assert!(ctx.enter("B").is_entered());
    ctx.leave("B");
    ctx.leave("A");
    assert_eq!(ctx.visiting_count(), 0);
}

#[test]
fn test_reentering_ancestor_is_a_cycle() {
    let mut ctx = ResolutionContext::default();
    assert!(ctx.enter("Node").is_entered());
    let result = ctx.enter("Node");
    assert!(result.is_cycle());
    // A cycle does not push a second entry.
    assert_eq!(ctx.visiting_count(), 1);
}

#[test]
fn test_depth_bound_is_exclusive() {
    let ctx = ResolutionContext::new(2);
    assert!(!ctx.exceeds_depth(0));
    assert!(!ctx.exceeds_depth(2));
    assert!(ctx.exceeds_depth(3));
    assert_eq!(ctx.max_depth(), 2);
}

#[test]
fn test_capacity_exceeded() {
    let mut ctx = ResolutionContext::new(30).with_max_visiting(2);
    assert_eq!(ctx.enter("A"), RecursionResult::Entered);
    assert_eq!(ctx.enter("B"), RecursionResult::Entered);
    assert_eq!(ctx.enter("C"), RecursionResult::CapacityExceeded);
    assert!(!ctx.is_visiting("C"));
}

#[test]
fn test_truncate_restores_earlier_path() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("Root");
    let before = ctx.visiting_count();
    ctx.enter("Child");
    ctx.enter("Grandchild");

    ctx.truncate(before);
    assert_eq!(ctx.path().collect::<Vec<_>>(), vec!["Root"]);

    ctx.reset();
    assert_eq!(ctx.visiting_count(), 0);
}

#[test]
fn test_cycle_to_self_keeps_frame_self_contained() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("Node");
    let mark = ctx.mark();
    assert!(ctx.enter("Node").is_cycle());
    ctx.leave("Node");
    assert!(ctx.close(mark).self_contained);
}

#[test]
fn test_cycle_to_ancestor_taints_inner_frames_only() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("A");
    let a = ctx.mark();
    ctx.enter("B");
    let b = ctx.mark();
    ctx.enter("C");
    let c = ctx.mark();

    assert!(ctx.enter("A").is_cycle());

    ctx.leave("C");
    assert!(!ctx.close(c).self_contained);
    ctx.leave("B");
    assert!(!ctx.close(b).self_contained);
    ctx.leave("A");
    assert!(ctx.close(a).self_contained);
}

#[test]
fn test_sibling_frames_are_tracked_independently() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("Root");
    let root = ctx.mark();

    ctx.enter("Left");
    let left = ctx.mark();
    assert!(ctx.enter("Root").is_cycle());
    ctx.leave("Left");
    assert!(!ctx.close(left).self_contained);

    ctx.enter("Right");
    let right = ctx.mark();
    ctx.leave("Right");
    assert!(ctx.close(right).self_contained);

    ctx.leave("Root");
    assert!(ctx.close(root).self_contained);
}

#[test]
fn test_close_reports_opened_subtree() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("Line");
    let line = ctx.mark();
    for _ in 0..2 {
        ctx.enter("Point");
        let point = ctx.mark();
        ctx.leave("Point");
        assert_eq!(ctx.close(point).opened, vec!["Point".to_string()]);
    }
    ctx.record_opened(&["Label".to_string()]);
    ctx.leave("Line");

    let closed = ctx.close(line);
    assert_eq!(closed.opened, vec!["Label", "Line", "Point"]);
    assert!(!ctx.touches_path(&closed.opened));
}

#[test]
fn test_touches_path() {
    let mut ctx = ResolutionContext::default();
    ctx.enter("B");
    assert!(ctx.touches_path(&["A".to_string(), "B".to_string()]));
    assert!(!ctx.touches_path(&["A".to_string()]));
}
