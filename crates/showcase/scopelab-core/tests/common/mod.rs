#![allow(dead_code)]
use std::rc::Rc;
use chrono::NaiveTime;
use scopelab_core::{Config, ImmediateClock, InMemorySurface, Session, TokioClock};

pub fn demo_surface() -> Rc<InMemorySurface> {
    Rc::new(
        InMemorySurface::new()
            .with_element("results")
            .with_element("box")
            .with_element("box-2")
            .with_element("modal")
            .with_child("modal", "modal-content")
            .with_element("loader")
            .with_child("loader", "loader-message"),
    )
}

pub fn noon_clock() -> Rc<ImmediateClock> {
    Rc::new(ImmediateClock::at_time(
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    ))
}

pub fn immediate_session() -> (Rc<InMemorySurface>, Rc<ImmediateClock>, Session) {
    let surface = demo_surface();
    let clock = noon_clock();
    let cfg = Config {
        rng_seed: Some(42),
        ..Config::default()
    };
    let session = Session::new(surface.clone(), clock.clone(), cfg);
    (surface, clock, session)
}

pub fn tokio_session() -> (Rc<InMemorySurface>, Session) {
    let surface = demo_surface();
    let session = Session::new(surface.clone(), Rc::new(TokioClock), Config::default());
    (surface, session)
}
