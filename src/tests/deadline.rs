use crate::deadline::{Deadline, NeverTimeout, PollLimit, Timeout, TimerDeadline};
use crate::tests::mock::MockTimer;

#[test]
fn test_never_timeout() {
    let mut deadline = NeverTimeout;

    for _ in 0..1_000 {
        assert_eq!(Ok(()), deadline.check());
    }
}

#[test]
fn test_poll_limit() {
    let mut deadline = PollLimit::new(2);
    assert_eq!(2, deadline.remaining());

    assert_eq!(Ok(()), deadline.check());
    assert_eq!(Ok(()), deadline.check());
    assert_eq!(0, deadline.remaining());

    assert_eq!(Err(Timeout), deadline.check());
    assert_eq!(Err(Timeout), deadline.check());
}

#[test]
fn test_poll_limit_zero() {
    let mut deadline = PollLimit::new(0);
    assert_eq!(Err(Timeout), deadline.check());
}

#[test]
fn test_closure_deadline() {
    let mut calls = 0;
    let mut deadline = || {
        calls += 1;
        Ok(())
    };

    deadline.check().unwrap();
    deadline.check().unwrap();
    assert_eq!(2, calls);
}

#[test]
fn test_timer_deadline_started_with_duration() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|duration| {
        assert_eq!(duration, MockTimer::duration_ms(2_000));
        Ok(())
    });

    assert!(TimerDeadline::start(&mut timer, MockTimer::duration_ms(2_000)).is_ok());
}

#[test]
fn test_timer_deadline_start_error() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Err(31));

    let result = TimerDeadline::start(&mut timer, MockTimer::duration_ms(1_000));
    assert_eq!(31, result.err().unwrap());
}

#[test]
fn test_timer_deadline_expires() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Ok(()));

    let mut calls = 0;
    timer.expect_wait().times(3).returning(move || {
        calls += 1;
        match calls {
            3 => nb::Result::Ok(()),
            _ => nb::Result::Err(nb::Error::WouldBlock),
        }
    });

    let mut deadline = TimerDeadline::start(&mut timer, MockTimer::duration_ms(1_000)).unwrap();
    assert_eq!(Ok(()), deadline.check());
    assert_eq!(Ok(()), deadline.check());
    assert_eq!(Err(Timeout), deadline.check());
}

#[test]
fn test_timer_deadline_wait_error() {
    let mut timer = MockTimer::new();
    timer.expect_start().times(1).returning(|_| Ok(()));
    timer
        .expect_wait()
        .times(1)
        .returning(|| nb::Result::Err(nb::Error::Other(1)));

    let mut deadline = TimerDeadline::start(&mut timer, MockTimer::duration_ms(1_000)).unwrap();
    assert_eq!(Err(Timeout), deadline.check());
}
