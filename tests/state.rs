extern crate crayon_gl;
extern crate env_logger;
extern crate rand;

use rand::Rng;

use crayon_gl::backends::headless::{Call, CallRecorder, HeadlessDriver};
use crayon_gl::context::BindingTarget;
use crayon_gl::prelude::*;

fn setup(driver: HeadlessDriver) -> (Context, CallRecorder) {
    let _ = env_logger::builder().is_test(true).try_init();
    let recorder = driver.recorder();
    let ctx = Context::new(Box::new(driver), ContextParams::default()).unwrap();
    recorder.clear();
    (ctx, recorder)
}

fn binds(recorder: &CallRecorder) -> usize {
    recorder.count(Call::is_bind)
}

fn viewports(recorder: &CallRecorder) -> usize {
    recorder.count(|v| match v {
        Call::Viewport(_) => true,
        _ => false,
    })
}

#[test]
fn redundant_binds_are_elided() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    fb.bind(FramebufferTarget::Draw).unwrap();
    fb.bind(FramebufferTarget::Draw).unwrap();
    fb.bind(FramebufferTarget::Draw).unwrap();

    assert_eq!(binds(&recorder), 1);
    assert_eq!(viewports(&recorder), 1);
    assert!(fb.is_bound(FramebufferTarget::Draw));
    assert!(!fb.is_bound(FramebufferTarget::Read));

    fb.bind(FramebufferTarget::Read).unwrap();
    assert_eq!(binds(&recorder), 2);
    assert_eq!(viewports(&recorder), 1);
    assert_eq!(recorder.framebuffer_bindings(), (fb.id(), fb.id()));
}

#[test]
fn first_bind_of_default_is_issued() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = DefaultFramebuffer::new(&ctx, Rect::with_size((64, 64)));

    // The native binding already is zero, but the cache does not know.
    fb.bind(FramebufferTarget::Draw).unwrap();
    assert_eq!(recorder.count_of(&Call::BindFramebuffer(FramebufferTarget::Draw, 0)), 1);

    fb.bind(FramebufferTarget::Draw).unwrap();
    assert_eq!(recorder.count_of(&Call::BindFramebuffer(FramebufferTarget::Draw, 0)), 1);
}

#[test]
fn alternating_binds() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let a = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let b = Framebuffer::new(&ctx, Rect::with_size((32, 32))).unwrap();

    for _ in 0..4 {
        a.bind(FramebufferTarget::Draw).unwrap();
        b.bind(FramebufferTarget::Draw).unwrap();
    }

    assert_eq!(binds(&recorder), 8);
    assert_eq!(viewports(&recorder), 8);
    assert_eq!(ctx.state().bound(BindingTarget::DrawFramebuffer), Some(b.id()));
    assert_eq!(ctx.state().viewport(), Rect::with_size((32, 32)));
}

#[test]
fn viewport_elision() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let mut fb = Framebuffer::new(&ctx, Rect::with_size((256, 256))).unwrap();
    fb.bind(FramebufferTarget::Draw).unwrap();
    recorder.clear();

    let mut rng = rand::thread_rng();
    let mut current = fb.viewport();
    let mut changes = 0;

    for _ in 0..200 {
        let size: i32 = rng.gen_range(1..4) * 64;
        let viewport = Rect::from_size((0, 0), (size, size));
        if viewport != current {
            changes += 1;
            current = viewport;
        }

        fb.set_viewport(viewport);
        assert_eq!(ctx.state().viewport(), viewport);
    }

    assert_eq!(viewports(&recorder), changes);
    assert_eq!(binds(&recorder), 0);
}

#[test]
fn viewport_of_unbound_framebuffer_is_deferred() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let mut fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    fb.set_viewport(Rect::with_size((16, 16)));
    assert_eq!(viewports(&recorder), 0);

    fb.bind(FramebufferTarget::Read).unwrap();
    assert_eq!(recorder.last(), Some(Call::Viewport(Rect::with_size((16, 16)))));
}

#[test]
fn reset_forces_rebind() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = DefaultFramebuffer::new(&ctx, Rect::with_size((64, 64)));
    fb.bind(FramebufferTarget::Draw).unwrap();

    // Foreign code binds something else behind the back of the cache.
    recorder.bind_framebuffer_externally(FramebufferTarget::Draw, 42);
    fb.bind(FramebufferTarget::Draw).unwrap();
    assert_eq!(recorder.framebuffer_bindings().1, 42);

    ctx.reset_state();
    assert_eq!(ctx.state().bound(BindingTarget::DrawFramebuffer), None);

    fb.bind(FramebufferTarget::Draw).unwrap();
    assert_eq!(recorder.framebuffer_bindings().1, 0);
    assert_eq!(recorder.count_of(&Call::BindFramebuffer(FramebufferTarget::Draw, 0)), 2);
    assert_eq!(viewports(&recorder), 2);
}

#[test]
fn deleting_bound_objects() {
    let (ctx, recorder) = setup(HeadlessDriver::new());

    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    fb.bind(FramebufferTarget::Read).unwrap();
    fb.bind(FramebufferTarget::Draw).unwrap();
    drop(fb);

    assert_eq!(ctx.state().bound(BindingTarget::ReadFramebuffer), Some(0));
    assert_eq!(ctx.state().bound(BindingTarget::DrawFramebuffer), Some(0));
    assert_eq!(recorder.framebuffer_bindings(), (0, 0));

    recorder.clear();
    let default = DefaultFramebuffer::new(&ctx, Rect::with_size((64, 64)));
    default.bind(FramebufferTarget::Draw).unwrap();
    assert_eq!(binds(&recorder), 0);

    let rb = Renderbuffer::new(&ctx).unwrap();
    rb.set_storage(RenderbufferFormat::RGBA8, Vector2::new(4, 4)).unwrap();
    let mut other = Framebuffer::new(&ctx, Rect::with_size((4, 4))).unwrap();
    other
        .attach_renderbuffer(BufferAttachment::Color(0), &rb)
        .unwrap();
    drop(rb);

    // Direct state access never bound the renderbuffer.
    assert_eq!(ctx.state().bound(BindingTarget::Renderbuffer), None);
}

#[test]
fn deleting_unbound_objects_keeps_state() {
    let (ctx, _) = setup(HeadlessDriver::new());
    let a = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let b = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    a.bind(FramebufferTarget::Draw).unwrap();
    drop(b);

    assert_eq!(ctx.state().bound(BindingTarget::DrawFramebuffer), Some(a.id()));
}

#[test]
fn fallback_binds_through_cache() {
    let (ctx, recorder) = setup(HeadlessDriver::new().with_version("3.3.0 Headless"));
    let rb = Renderbuffer::new(&ctx).unwrap();

    rb.set_storage(RenderbufferFormat::Depth24, Vector2::new(8, 8)).unwrap();
    rb.set_storage(RenderbufferFormat::Depth24, Vector2::new(16, 16)).unwrap();

    assert_eq!(recorder.count_of(&Call::BindRenderbuffer(rb.id())), 1);
    assert_eq!(ctx.state().bound(BindingTarget::Renderbuffer), Some(rb.id()));

    let id = rb.id();
    drop(rb);
    assert_eq!(ctx.state().bound(BindingTarget::Renderbuffer), Some(0));
    assert_eq!(recorder.renderbuffer_binding(), 0);
    assert!(!recorder.is_alive(id));
}
