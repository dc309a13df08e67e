extern crate crayon_gl;
extern crate env_logger;

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

fn buffer(ctx: &Context, size: usize) -> Buffer {
    let mut buffer = Buffer::new(ctx).unwrap();
    buffer.set_data(&vec![0u8; size], BufferUsage::StreamCopy);
    buffer
}

#[test]
fn unsupported() {
    let (ctx, recorder) = setup(HeadlessDriver::new().with_version("3.3.0 Headless"));

    match TransformFeedback::new(&ctx) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("GL 3.3 has no transform feedback objects"),
    }

    assert!(recorder.is_empty());
}

#[test]
fn attach_with_direct_access() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let tf = TransformFeedback::new(&ctx).unwrap();
    let a = buffer(&ctx, 64);
    let b = buffer(&ctx, 64);
    assert_eq!(a.size(), 64);
    recorder.clear();

    tf.attach_buffers(1, &[&a, &b]).unwrap();
    tf.attach_buffer_range(0, &a, 16, 32).unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::TransformFeedbackBuffer(tf.id(), 1, a.id(), None),
            Call::TransformFeedbackBuffer(tf.id(), 2, b.id(), None),
            Call::TransformFeedbackBuffer(tf.id(), 0, a.id(), Some((16, 32))),
        ]
    );

    assert!(!tf.is_bound());
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn attach_with_fallback() {
    let driver = HeadlessDriver::new()
        .with_version("3.3.0 Headless")
        .with_extensions(&["GL_ARB_transform_feedback2"]);
    let (ctx, recorder) = setup(driver);
    let tf = TransformFeedback::new(&ctx).unwrap();
    let a = buffer(&ctx, 16);
    assert!(!tf.is_created());

    tf.attach_buffer(0, &a).unwrap();
    tf.attach_buffer(1, &a).unwrap();

    assert!(tf.is_created());
    assert!(tf.is_bound());
    assert_eq!(recorder.count_of(&Call::BindTransformFeedback(tf.id())), 1);
    assert_eq!(
        recorder.last(),
        Some(Call::BindTransformFeedbackBuffer(1, a.id(), None))
    );
    assert_eq!(
        recorder.count_of(&Call::BufferData(16, BufferUsage::StreamCopy)),
        1
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn binding_limits() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let tf = TransformFeedback::new(&ctx).unwrap();
    let a = buffer(&ctx, 16);
    recorder.clear();

    match tf.attach_buffer(4, &a) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("only 4 binding points are supported"),
    }

    match tf.attach_buffers(3, &[&a, &a]) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("only 4 binding points are supported"),
    }

    match tf.attach_buffers(u32::MAX, &[&a]) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("the binding index is out of range"),
    }

    match tf.attach_buffers(u32::MAX - 1, &[&a, &a, &a]) {
        Err(Error::Requirement(_)) => {}
        _ => panic!("the last binding index does not fit"),
    }

    assert!(tf.attach_buffers(0, &[]).is_ok());
    assert!(recorder.is_empty());
}

#[test]
fn attach_to_wrapped_names() {
    let mut driver = HeadlessDriver::new();
    let id = driver.gen_transform_feedback();
    let buffer_id = driver.gen_buffer();
    let (ctx, recorder) = setup(driver);

    let tf = TransformFeedback::wrap(&ctx, id, ObjectFlags::DELETE_ON_DROP);
    let mut buffer = Buffer::wrap(&ctx, buffer_id, ObjectFlags::DELETE_ON_DROP);
    assert!(!tf.is_created());
    assert!(!buffer.is_created());

    buffer.set_data(&[0u8; 16], BufferUsage::StreamCopy);
    assert!(buffer.is_created());
    assert!(recorder.is_materialized(buffer_id));

    tf.attach_buffer(0, &buffer).unwrap();
    assert!(tf.is_created());
    assert!(recorder.is_materialized(id));
    assert_eq!(
        recorder.last(),
        Some(Call::TransformFeedbackBuffer(id, 0, buffer_id, None))
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn capture() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let tf = TransformFeedback::new(&ctx).unwrap();
    recorder.clear();

    tf.begin(PrimitiveMode::Triangles);
    tf.pause();
    tf.resume();
    tf.end();

    assert_eq!(
        recorder.calls(),
        vec![
            Call::BindTransformFeedback(tf.id()),
            Call::BeginTransformFeedback(PrimitiveMode::Triangles),
            Call::PauseTransformFeedback,
            Call::ResumeTransformFeedback,
            Call::EndTransformFeedback,
        ]
    );
    assert_eq!(ctx.check(), Ok(()));
}

#[test]
fn rebinding_while_active_is_reported() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let a = TransformFeedback::new(&ctx).unwrap();
    let b = TransformFeedback::new(&ctx).unwrap();

    a.begin(PrimitiveMode::Points);
    b.bind();

    assert_eq!(ctx.error(), Some(DriverError::InvalidOperation));
    assert_eq!(recorder.transform_feedback_binding(), a.id());
}

#[test]
fn drop_bound() {
    let (ctx, recorder) = setup(HeadlessDriver::new());
    let tf = TransformFeedback::new(&ctx).unwrap();
    tf.bind();
    assert_eq!(ctx.state().bound(BindingTarget::TransformFeedback), Some(tf.id()));

    drop(tf);
    assert_eq!(ctx.state().bound(BindingTarget::TransformFeedback), Some(0));
    assert_eq!(recorder.transform_feedback_binding(), 0);
}
