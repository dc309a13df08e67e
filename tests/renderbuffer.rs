extern crate crayon_gl;
extern crate env_logger;

use crayon_gl::backends::headless::{Call, CallRecorder, HeadlessDriver};
use crayon_gl::backends::IntegerName;
use crayon_gl::prelude::*;

fn setup(driver: HeadlessDriver) -> (Context, CallRecorder) {
    let _ = env_logger::builder().is_test(true).try_init();
    let recorder = driver.recorder();
    let ctx = Context::new(Box::new(driver), ContextParams::default()).unwrap();
    recorder.clear();
    (ctx, recorder)
}

#[test]
fn storage_with_direct_access() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let rb = Renderbuffer::new(&ctx).unwrap();
    assert!(rb.is_created());

    rb.set_storage_multisample(4, RenderbufferFormat::Depth24Stencil8, Vector2::new(256, 128))
        .unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::CreateRenderbuffer(rb.id()),
            Call::NamedRenderbufferStorage(
                rb.id(),
                4,
                RenderbufferFormat::Depth24Stencil8,
                Vector2::new(256, 128)
            ),
        ]
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn storage_with_fallback() {
    let (ctx, recorder) = setup(HeadlessDriver::new().with_version("3.3.0 Headless"));
    let rb = Renderbuffer::new(&ctx).unwrap();
    assert!(!rb.is_created());
    assert!(!recorder.is_materialized(rb.id()));

    rb.set_storage(RenderbufferFormat::RGBA16F, Vector2::new(32, 32)).unwrap();

    assert!(rb.is_created());
    assert_eq!(
        recorder.calls(),
        vec![
            Call::GenRenderbuffer(rb.id()),
            Call::BindRenderbuffer(rb.id()),
            Call::RenderbufferStorage(0, RenderbufferFormat::RGBA16F, Vector2::new(32, 32)),
        ]
    );
    assert_eq!(recorder.renderbuffer_binding(), rb.id());
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn storage_limits() {
    let driver = HeadlessDriver::new()
        .with_integer(IntegerName::MaxRenderbufferSize, [1024, 0])
        .with_integer(IntegerName::MaxSamples, [4, 0]);
    let (ctx, recorder) = setup(driver);
    let rb = Renderbuffer::new(&ctx).unwrap();
    recorder.clear();

    match rb.set_storage(RenderbufferFormat::RGBA8, Vector2::new(2048, 16)) {
        Err(Error::ResourceCreation { kind, .. }) => assert_eq!(kind, "renderbuffer"),
        _ => panic!("the size exceeds the maximum"),
    }

    match rb.set_storage_multisample(8, RenderbufferFormat::RGBA8, Vector2::new(16, 16)) {
        Err(Error::ResourceCreation { .. }) => {}
        _ => panic!("the sample count exceeds the maximum"),
    }

    match rb.set_storage(RenderbufferFormat::RGBA8, Vector2::new(-1, 16)) {
        Err(Error::ResourceCreation { .. }) => {}
        _ => panic!("negative sizes are invalid"),
    }

    assert!(recorder.is_empty());
    assert!(rb
        .set_storage_multisample(4, RenderbufferFormat::RGBA8, Vector2::new(1024, 1024))
        .is_ok());
}

#[test]
fn labels() {
    let driver = HeadlessDriver::new()
        .with_version("3.3.0 Headless")
        .with_extensions(&["GL_KHR_debug"]);
    let (ctx, recorder) = setup(driver);
    let rb = Renderbuffer::new(&ctx).unwrap();
    assert_eq!(rb.label(), "");

    rb.set_label("depth");
    assert!(rb.is_created());
    assert_eq!(rb.label(), "depth");
    assert_eq!(
        recorder.count_of(&Call::ObjectLabel(
            crayon_gl::backends::ObjectKind::Renderbuffer,
            rb.id(),
            "depth".to_owned()
        )),
        1
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn drop_and_release() {
    let (ctx, recorder) = setup(HeadlessDriver::new());

    let rb = Renderbuffer::new(&ctx).unwrap();
    let id = rb.id();
    drop(rb);
    assert_eq!(recorder.count_of(&Call::DeleteRenderbuffer(id)), 1);

    let rb = Renderbuffer::new(&ctx).unwrap();
    let id = rb.release();
    assert!(recorder.is_alive(id));

    let rb = Renderbuffer::wrap(&ctx, id, ObjectFlags::CREATED | ObjectFlags::DELETE_ON_DROP);
    assert_eq!(rb.id(), id);
    drop(rb);
    assert!(!recorder.is_alive(id));
}

#[test]
fn formats() {
    assert!(RenderbufferFormat::RGBA8.is_color());
    assert!(RenderbufferFormat::SRGB8Alpha8.is_color());
    assert!(!RenderbufferFormat::Depth32F.is_color());
    assert!(!RenderbufferFormat::Stencil8.is_color());
}
