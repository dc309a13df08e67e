extern crate crayon_gl;
extern crate env_logger;

use crayon_gl::backends::headless::{Call, CallRecorder, HeadlessDriver};
use crayon_gl::backends::IntegerName;
use crayon_gl::context::BindingTarget;
use crayon_gl::prelude::*;

fn setup(driver: HeadlessDriver) -> (Context, CallRecorder) {
    let _ = env_logger::builder().is_test(true).try_init();
    let recorder = driver.recorder();
    let ctx = Context::new(Box::new(driver), ContextParams::default()).unwrap();
    recorder.clear();
    (ctx, recorder)
}

fn legacy() -> HeadlessDriver {
    HeadlessDriver::new().with_version("3.3.0 Headless")
}

#[test]
fn eager_creation() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    assert!(fb.is_created());
    assert_eq!(fb.flags(), ObjectFlags::CREATED | ObjectFlags::DELETE_ON_DROP);
    assert_eq!(recorder.calls(), vec![Call::CreateFramebuffer(fb.id())]);
    assert!(recorder.is_materialized(fb.id()));
}

#[test]
fn deferred_creation() {
    let (ctx, recorder) = setup(legacy());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let id = fb.id();

    assert!(!fb.is_created());
    assert_eq!(recorder.calls(), vec![Call::GenFramebuffer(id)]);
    assert!(recorder.is_alive(id));
    assert!(!recorder.is_materialized(id));

    fb.bind(FramebufferTarget::Draw).unwrap();
    assert!(fb.is_created());
    assert!(recorder.is_materialized(id));
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn oversized_viewport() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    match Framebuffer::new(&ctx, Rect::with_size((20000, 64))) {
        Err(Error::ResourceCreation { kind, .. }) => assert_eq!(kind, "framebuffer"),
        _ => panic!("the viewport exceeds the maximum dimensions"),
    }

    assert!(recorder.is_empty());

    let (ctx, recorder) = setup(legacy());
    let fb = Framebuffer::new(&ctx, Rect::with_size((20000, 64))).unwrap();
    recorder.clear();

    match fb.bind(FramebufferTarget::Draw) {
        Err(Error::ResourceCreation { .. }) => {}
        _ => panic!("the viewport exceeds the maximum dimensions"),
    }

    assert!(recorder.is_empty());
    assert!(!fb.is_created());
    assert_eq!(ctx.state().bound(BindingTarget::DrawFramebuffer), None);
}

#[test]
fn allocation_failure() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    recorder.fail_next_allocation();

    match Framebuffer::new(&ctx, Rect::with_size((64, 64))) {
        Err(Error::ResourceCreation { .. }) => {}
        _ => panic!("the driver returned no name"),
    }

    assert!(Framebuffer::new(&ctx, Rect::with_size((64, 64))).is_ok());
}

#[test]
fn release_and_wrap() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let id = fb.release();

    assert_eq!(recorder.count_of(&Call::DeleteFramebuffer(id)), 0);
    assert!(recorder.is_alive(id));

    let fb = Framebuffer::wrap(&ctx, id, Rect::with_size((64, 64)), ObjectFlags::CREATED);
    drop(fb);
    assert!(recorder.is_alive(id));

    let fb = Framebuffer::wrap(
        &ctx,
        id,
        Rect::with_size((64, 64)),
        ObjectFlags::CREATED | ObjectFlags::DELETE_ON_DROP,
    );
    drop(fb);
    assert_eq!(recorder.count_of(&Call::DeleteFramebuffer(id)), 1);
    assert!(!recorder.is_alive(id));
}

#[test]
fn attach_with_direct_access() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let rb = Renderbuffer::new(&ctx).unwrap();
    rb.set_storage(RenderbufferFormat::RGBA8, Vector2::new(64, 64)).unwrap();

    let mut fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    assert_eq!(
        fb.check_status(FramebufferTarget::Draw).unwrap(),
        FramebufferStatus::IncompleteMissingAttachment
    );

    fb.attach_renderbuffer(BufferAttachment::Color(0), &rb).unwrap();
    fb.attach_renderbuffer(BufferAttachment::Color(0), &rb).unwrap();

    let call = Call::NamedFramebufferRenderbuffer(fb.id(), BufferAttachment::Color(0), rb.id());
    assert_eq!(recorder.count_of(&call), 1);
    assert_eq!(
        fb.attachment(BufferAttachment::Color(0)),
        Some(AttachmentSource::Renderbuffer(rb.id()))
    );
    assert_eq!(
        fb.check_status(FramebufferTarget::Draw).unwrap(),
        FramebufferStatus::Complete
    );

    assert_eq!(recorder.count(Call::is_bind), 0);
    assert_eq!(ctx.check(), Ok(()));

    fb.detach(BufferAttachment::Color(0)).unwrap();
    assert_eq!(fb.attachment(BufferAttachment::Color(0)), None);
    assert_eq!(
        fb.check_status(FramebufferTarget::Read).unwrap(),
        FramebufferStatus::IncompleteMissingAttachment
    );
}

#[test]
fn attach_with_fallback() {
    let (ctx, recorder) = setup(legacy());
    let rb = Renderbuffer::new(&ctx).unwrap();
    let mut fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    fb.attach_renderbuffer(BufferAttachment::Depth, &rb).unwrap();
    fb.attach_texture(BufferAttachment::Color(0), TextureTarget::Texture2D, 7, 0)
        .unwrap();

    assert_eq!(recorder.count_of(&Call::BindRenderbuffer(rb.id())), 1);
    assert_eq!(
        recorder.count_of(&Call::BindFramebuffer(FramebufferTarget::Read, fb.id())),
        1
    );
    assert_eq!(
        recorder.count_of(&Call::FramebufferRenderbuffer(
            FramebufferTarget::Read,
            BufferAttachment::Depth,
            rb.id()
        )),
        1
    );
    assert_eq!(
        recorder.last(),
        Some(Call::FramebufferTexture(
            FramebufferTarget::Read,
            BufferAttachment::Color(0),
            TextureTarget::Texture2D,
            7,
            0
        ))
    );

    // Editing reuses the draw binding when there is one.
    fb.bind(FramebufferTarget::Draw).unwrap();
    ctx.reset_state();
    fb.bind(FramebufferTarget::Draw).unwrap();
    recorder.clear();

    fb.detach(BufferAttachment::Depth).unwrap();
    assert_eq!(
        recorder.calls(),
        vec![Call::FramebufferRenderbuffer(
            FramebufferTarget::Draw,
            BufferAttachment::Depth,
            0
        )]
    );

    assert_eq!(
        fb.check_status(FramebufferTarget::Draw).unwrap(),
        FramebufferStatus::Complete
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn attachment_limits() {
    let driver = HeadlessDriver::new().with_integer(IntegerName::MaxColorAttachments, [4, 0]);
    let (ctx, recorder) = setup(driver);
    let mut fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    recorder.clear();

    match fb.attach_texture(BufferAttachment::Color(4), TextureTarget::Texture2D, 1, 0) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("only 4 color attachments are supported"),
    }

    match fb.map_for_read(DrawAttachment::Color(4)) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("only 4 color attachments are supported"),
    }

    assert!(recorder.is_empty());
    assert!(fb
        .attach_texture(BufferAttachment::Color(3), TextureTarget::CubeMap(CubeMapFace::NegativeZ), 1, 0)
        .is_ok());
}

#[test]
fn draw_and_read_mapping() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    recorder.clear();

    fb.map_for_draw(&[(0, DrawAttachment::Color(0)), (2, DrawAttachment::Color(1))])
        .unwrap();
    assert_eq!(
        recorder.last(),
        Some(Call::NamedFramebufferDrawBuffers(
            fb.id(),
            vec![
                DrawAttachment::Color(0),
                DrawAttachment::None,
                DrawAttachment::Color(1)
            ]
        ))
    );

    fb.map_for_read(DrawAttachment::Color(1)).unwrap();
    assert_eq!(
        recorder.last(),
        Some(Call::NamedFramebufferReadBuffer(fb.id(), DrawAttachment::Color(1)))
    );

    match fb.map_for_draw(&[(8, DrawAttachment::Color(0))]) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("only 8 draw buffers are supported"),
    }

    let (ctx, recorder) = setup(legacy());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    fb.map_for_draw_single(DrawAttachment::Color(0)).unwrap();
    assert_eq!(
        recorder.last(),
        Some(Call::DrawBuffers(vec![DrawAttachment::Color(0)]))
    );
    assert!(fb.is_bound(FramebufferTarget::Read));
}

#[test]
fn clear_and_read() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((2, 2))).unwrap();

    ctx.set_clear_color([1.0, 0.0, 0.0, 1.0]);
    fb.clear(ClearMask::COLOR | ClearMask::DEPTH).unwrap();
    assert!(fb.is_bound(FramebufferTarget::Draw));

    let mut image = Image2D::empty(PixelFormat::RGBA, PixelType::UnsignedByte);
    fb.read(Rect::with_size((2, 2)), &mut image).unwrap();

    assert!(fb.is_bound(FramebufferTarget::Read));
    assert_eq!(image.size(), Vector2::new(2, 2));
    assert_eq!(image.data(), &[255u8, 0, 0, 255].repeat(4)[..]);
    assert_eq!(
        recorder.last(),
        Some(Call::ReadNPixels(
            Rect::with_size((2, 2)),
            PixelFormat::RGBA,
            PixelType::UnsignedByte,
            16
        ))
    );

    recorder.clear();
    fb.clear(ClearMask::empty()).unwrap();
    assert!(recorder.is_empty());
}

#[test]
fn robust_read_checks_capacity() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((4, 4))).unwrap();
    recorder.clear();

    let mut data = [0u8; 4];
    let rect = Rect::with_size((2, 2));
    match fb.read_into(rect, PixelFormat::RGBA, PixelType::UnsignedByte, &mut data) {
        Err(Error::BufferOverflow { required, actual }) => {
            assert_eq!(required, 16);
            assert_eq!(actual, 4);
        }
        _ => panic!("the buffer is undersized"),
    }

    assert!(recorder.is_empty());
    assert!(!fb.is_bound(FramebufferTarget::Read));

    let mut data = [0u8; 16];
    fb.read_into(rect, PixelFormat::RGBA, PixelType::UnsignedByte, &mut data)
        .unwrap();
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn plain_read() {
    let (ctx, recorder) = setup(legacy());
    let fb = DefaultFramebuffer::new(&ctx, Rect::with_size((4, 4)));

    ctx.set_clear_color([0.0, 1.0, 0.0, 1.0]);
    fb.clear(ClearMask::COLOR).unwrap();

    let mut data = [0u8; 4 * 4];
    fb.read_into(Rect::with_size((2, 1)), PixelFormat::RGBA, PixelType::UnsignedShort, &mut data)
        .unwrap();

    assert_eq!(
        recorder.last(),
        Some(Call::ReadPixels(
            Rect::with_size((2, 1)),
            PixelFormat::RGBA,
            PixelType::UnsignedShort
        ))
    );
    assert_eq!(&data[..4], &[0u8, 0, 255, 255][..]);
}

#[test]
fn invalidate_with_direct_access() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let before = ctx.state();
    recorder.clear();

    fb.invalidate(&[InvalidationAttachment::Color(0), InvalidationAttachment::Depth]);
    assert_eq!(
        recorder.calls(),
        vec![Call::InvalidateNamedFramebuffer(
            fb.id(),
            vec![InvalidationAttachment::Color(0), InvalidationAttachment::Depth],
            None
        )]
    );

    fb.invalidate(&[]);
    assert_eq!(recorder.len(), 1);
    assert_eq!(ctx.state(), before);
}

#[test]
fn invalidate_with_fallback() {
    let mut params = ContextParams::default();
    params.disable(vec!["GL_ARB_direct_state_access"]);
    let driver = HeadlessDriver::new();
    let recorder = driver.recorder();
    let ctx = Context::new(Box::new(driver), params).unwrap();

    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    let default = DefaultFramebuffer::new(&ctx, Rect::with_size((64, 64)));

    // Nothing to discard before the object exists.
    fb.invalidate(&[InvalidationAttachment::Color(0)]);
    assert_eq!(
        recorder.count(|v| match v {
            Call::InvalidateFramebuffer(..) => true,
            _ => false,
        }),
        0
    );

    fb.bind(FramebufferTarget::Draw).unwrap();
    default.bind(FramebufferTarget::Draw).unwrap();
    let before = ctx.state();
    recorder.clear();

    let rect = Some(Rect::with_size((8, 8)));
    fb.invalidate_rect(&[InvalidationAttachment::Color(0)], rect);
    assert_eq!(
        recorder.calls(),
        vec![
            Call::BindFramebuffer(FramebufferTarget::Draw, fb.id()),
            Call::InvalidateFramebuffer(
                FramebufferTarget::Draw,
                fb.id(),
                vec![InvalidationAttachment::Color(0)],
                rect
            ),
            Call::BindFramebuffer(FramebufferTarget::Draw, 0),
        ]
    );

    assert_eq!(ctx.state(), before);
    assert_eq!(recorder.framebuffer_bindings().1, 0);

    // A bound framebuffer is invalidated in place.
    fb.bind(FramebufferTarget::Read).unwrap();
    recorder.clear();
    fb.invalidate(&[InvalidationAttachment::Stencil]);
    assert_eq!(
        recorder.calls(),
        vec![Call::InvalidateFramebuffer(
            FramebufferTarget::Read,
            fb.id(),
            vec![InvalidationAttachment::Stencil],
            None
        )]
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn invalidate_default_with_fallback() {
    let mut params = ContextParams::default();
    params.disable(vec!["GL_ARB_direct_state_access"]);
    let driver = HeadlessDriver::new();
    let recorder = driver.recorder();
    let ctx = Context::new(Box::new(driver), params).unwrap();

    let default = DefaultFramebuffer::new(&ctx, Rect::with_size((64, 64)));
    default.bind(FramebufferTarget::Read).unwrap();
    recorder.clear();

    default.invalidate(&[InvalidationAttachment::Color(0), InvalidationAttachment::Depth]);

    // The binding comes from the cache, the driver state is never queried.
    assert_eq!(
        recorder.calls(),
        vec![Call::InvalidateFramebuffer(
            FramebufferTarget::Read,
            0,
            vec![InvalidationAttachment::Color(0), InvalidationAttachment::Depth],
            None
        )]
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn invalidate_without_support() {
    let (ctx, recorder) = setup(legacy());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    fb.bind(FramebufferTarget::Draw).unwrap();
    recorder.clear();

    fb.invalidate(&[InvalidationAttachment::Color(0)]);
    assert!(recorder.is_empty());
}

#[test]
fn labels() {
    let (ctx, _) = setup(HeadlessDriver::new());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    fb.set_label("shadow map").unwrap();
    assert_eq!(fb.label(), "shadow map");

    let (ctx, recorder) = setup(legacy());
    let fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();
    fb.set_label("shadow map").unwrap();
    assert_eq!(fb.label(), "");
    assert!(!fb.is_created());
    assert_eq!(
        recorder.count(|v| match v {
            Call::ObjectLabel(..) => true,
            _ => false,
        }),
        0
    );
}

#[test]
fn multisample_textures() {
    let driver = HeadlessDriver::new().with_version("3.1.0 Headless");
    let (ctx, _) = setup(driver);
    let mut fb = Framebuffer::new(&ctx, Rect::with_size((64, 64))).unwrap();

    match fb.attach_texture(BufferAttachment::Color(0), TextureTarget::Multisample2D, 1, 0) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("GL 3.1 has no multisample textures"),
    }

    assert!(fb
        .attach_texture(BufferAttachment::Color(0), TextureTarget::Layer(2), 1, 0)
        .is_ok());
}

#[test]
fn extreme_viewport() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let viewport = Rect::new(Point2::new(i32::MIN, 0), Point2::new(i32::MAX, 64));

    match Framebuffer::new(&ctx, viewport) {
        Err(Error::ResourceCreation { .. }) => {}
        _ => panic!("the viewport exceeds the maximum dimensions"),
    }

    assert!(recorder.is_empty());
}
