//! A driver that needs no GPU.
//!
//! It keeps just enough state to behave like a conforming implementation for
//! the calls this crate issues: object names and whether they were
//! materialized, the four tracked binding points, attachments and a solid
//! fill color per framebuffer, so that a clear (or a blit) followed by a read
//! round-trips. Every call is appended to a `CallRecorder`, which also lets
//! tests inject driver errors after the driver was moved into a context.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use byteorder::{ByteOrder, NativeEndian};

use super::{Driver, IntegerName, ObjectId, ObjectKind, StringName};
use crate::buffer::BufferUsage;
use crate::errors::DriverError;
use crate::framebuffer::{
    BlitFilter, BlitMask, BufferAttachment, ClearMask, DrawAttachment, FramebufferStatus,
    FramebufferTarget, InvalidationAttachment, TextureTarget,
};
use crate::image::{self, PixelFormat, PixelType};
use crate::math::prelude::{Rect, Vector2};
use crate::renderbuffer::RenderbufferFormat;
use crate::transform_feedback::PrimitiveMode;

/// A native call, as seen by the headless driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetString(StringName),
    GetStringIndexed(StringName, u32),
    GetInteger(IntegerName),
    GetError,
    PackAlignment(i32),
    ClearColor([f32; 4]),
    ObjectLabel(ObjectKind, ObjectId, String),
    GetObjectLabel(ObjectKind, ObjectId),

    GenFramebuffer(ObjectId),
    CreateFramebuffer(ObjectId),
    DeleteFramebuffer(ObjectId),
    BindFramebuffer(FramebufferTarget, ObjectId),
    Viewport(Rect),
    Clear(ClearMask),
    CheckFramebufferStatus(FramebufferTarget),
    CheckNamedFramebufferStatus(ObjectId, FramebufferTarget),
    DrawBuffers(Vec<DrawAttachment>),
    NamedFramebufferDrawBuffers(ObjectId, Vec<DrawAttachment>),
    ReadBuffer(DrawAttachment),
    NamedFramebufferReadBuffer(ObjectId, DrawAttachment),
    InvalidateFramebuffer(FramebufferTarget, ObjectId, Vec<InvalidationAttachment>, Option<Rect>),
    InvalidateNamedFramebuffer(ObjectId, Vec<InvalidationAttachment>, Option<Rect>),
    FramebufferRenderbuffer(FramebufferTarget, BufferAttachment, ObjectId),
    NamedFramebufferRenderbuffer(ObjectId, BufferAttachment, ObjectId),
    FramebufferTexture(FramebufferTarget, BufferAttachment, TextureTarget, ObjectId, i32),
    NamedFramebufferTexture(ObjectId, BufferAttachment, TextureTarget, ObjectId, i32),
    ReadPixels(Rect, PixelFormat, PixelType),
    ReadNPixels(Rect, PixelFormat, PixelType, usize),
    BlitFramebuffer(Rect, Rect, BlitMask, BlitFilter),
    BlitNamedFramebuffer(ObjectId, ObjectId, Rect, Rect, BlitMask, BlitFilter),

    GenRenderbuffer(ObjectId),
    CreateRenderbuffer(ObjectId),
    DeleteRenderbuffer(ObjectId),
    BindRenderbuffer(ObjectId),
    RenderbufferStorage(i32, RenderbufferFormat, Vector2<i32>),
    NamedRenderbufferStorage(ObjectId, i32, RenderbufferFormat, Vector2<i32>),

    GenBuffer(ObjectId),
    CreateBuffer(ObjectId),
    DeleteBuffer(ObjectId),
    BindArrayBuffer(ObjectId),
    BufferData(usize, BufferUsage),
    NamedBufferData(ObjectId, usize, BufferUsage),

    GenTransformFeedback(ObjectId),
    CreateTransformFeedback(ObjectId),
    DeleteTransformFeedback(ObjectId),
    BindTransformFeedback(ObjectId),
    BindTransformFeedbackBuffer(u32, ObjectId, Option<(isize, isize)>),
    TransformFeedbackBuffer(ObjectId, u32, ObjectId, Option<(isize, isize)>),
    BeginTransformFeedback(PrimitiveMode),
    PauseTransformFeedback,
    ResumeTransformFeedback,
    EndTransformFeedback,
}

impl Call {
    /// Checks if this call only reads context information.
    pub fn is_query(&self) -> bool {
        match *self {
            Call::GetString(_) | Call::GetStringIndexed(_, _) | Call::GetInteger(_) => true,
            _ => false,
        }
    }

    /// Checks if this call changes one of the tracked binding points.
    pub fn is_bind(&self) -> bool {
        match *self {
            Call::BindFramebuffer(_, _)
            | Call::BindRenderbuffer(_)
            | Call::BindTransformFeedback(_) => true,
            _ => false,
        }
    }

    /// Checks if this call brings an object into existence right away.
    pub fn is_create(&self) -> bool {
        match *self {
            Call::CreateFramebuffer(_)
            | Call::CreateRenderbuffer(_)
            | Call::CreateBuffer(_)
            | Call::CreateTransformFeedback(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct HeadlessObject {
    kind: ObjectKind,
    materialized: bool,
    label: String,
    fill: [f32; 4],
    attachments: HashSet<BufferAttachment>,
}

impl HeadlessObject {
    fn new(kind: ObjectKind, materialized: bool) -> Self {
        HeadlessObject {
            kind,
            materialized,
            label: String::new(),
            fill: [0.0; 4],
            attachments: HashSet::new(),
        }
    }
}

struct HeadlessState {
    calls: Vec<Call>,
    errors: VecDeque<DriverError>,
    fail_next_allocation: bool,
    objects: HashMap<ObjectId, HeadlessObject>,
    next_id: ObjectId,
    default_fill: [f32; 4],
    clear_color: [f32; 4],
    read_framebuffer: ObjectId,
    draw_framebuffer: ObjectId,
    renderbuffer: ObjectId,
    transform_feedback: ObjectId,
    transform_feedback_active: bool,
}

/// Shared view into a `HeadlessDriver`. Clones observe the same driver.
#[derive(Clone)]
pub struct CallRecorder {
    state: Rc<RefCell<HeadlessState>>,
}

impl CallRecorder {
    /// Returns all recorded calls, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counts the recorded calls which match `predicate`.
    pub fn count<F: Fn(&Call) -> bool>(&self, predicate: F) -> usize {
        self.state.borrow().calls.iter().filter(|v| predicate(v)).count()
    }

    /// Counts the recorded calls which are equal to `call`.
    pub fn count_of(&self, call: &Call) -> usize {
        self.count(|v| v == call)
    }

    pub fn last(&self) -> Option<Call> {
        self.state.borrow().calls.last().cloned()
    }

    /// Forgets recorded calls, the driver state is kept.
    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Latches `err` as if the last call had failed.
    pub fn inject_error(&self, err: DriverError) {
        self.state.borrow_mut().errors.push_back(err);
    }

    /// Makes the next name allocation of any kind return zero.
    pub fn fail_next_allocation(&self) {
        self.state.borrow_mut().fail_next_allocation = true;
    }

    /// Checks if the name was allocated and not deleted yet.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.state.borrow().objects.contains_key(&id)
    }

    /// Checks if the object behind a name exists, either because it was
    /// created directly or because it was bound once.
    pub fn is_materialized(&self, id: ObjectId) -> bool {
        self.state
            .borrow()
            .objects
            .get(&id)
            .map(|v| v.materialized)
            .unwrap_or(false)
    }

    /// Returns the names bound to the read and draw framebuffer targets.
    pub fn framebuffer_bindings(&self) -> (ObjectId, ObjectId) {
        let state = self.state.borrow();
        (state.read_framebuffer, state.draw_framebuffer)
    }

    pub fn renderbuffer_binding(&self) -> ObjectId {
        self.state.borrow().renderbuffer
    }

    pub fn transform_feedback_binding(&self) -> ObjectId {
        self.state.borrow().transform_feedback
    }

    /// Binds a framebuffer behind the back of the context, like foreign code
    /// sharing the native context would.
    pub fn bind_framebuffer_externally(&self, target: FramebufferTarget, id: ObjectId) {
        let mut state = self.state.borrow_mut();
        match target {
            FramebufferTarget::Read => state.read_framebuffer = id,
            FramebufferTarget::Draw => state.draw_framebuffer = id,
        }
    }
}

/// See the module documentation.
pub struct HeadlessDriver {
    version: String,
    vendor: String,
    renderer: String,
    extensions: Vec<String>,
    integers: HashMap<IntegerName, [i32; 2]>,
    state: Rc<RefCell<HeadlessState>>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        HeadlessDriver::new()
    }
}

impl HeadlessDriver {
    /// A desktop GL 4.5 core context, which has every optional feature as
    /// part of the core version.
    pub fn new() -> Self {
        let mut integers = HashMap::new();
        integers.insert(IntegerName::ContextFlags, [0, 0]);
        integers.insert(IntegerName::ContextProfileMask, [1, 0]);
        integers.insert(IntegerName::MaxViewportDims, [16384, 16384]);
        integers.insert(IntegerName::MaxColorAttachments, [8, 0]);
        integers.insert(IntegerName::MaxDrawBuffers, [8, 0]);
        integers.insert(IntegerName::MaxRenderbufferSize, [16384, 0]);
        integers.insert(IntegerName::MaxSamples, [8, 0]);
        integers.insert(IntegerName::MaxTransformFeedbackSeparateAttribs, [4, 0]);
        integers.insert(IntegerName::MaxTransformFeedbackInterleavedComponents, [64, 0]);
        integers.insert(IntegerName::MaxTransformFeedbackBuffers, [4, 0]);

        let state = HeadlessState {
            calls: Vec::new(),
            errors: VecDeque::new(),
            fail_next_allocation: false,
            objects: HashMap::new(),
            next_id: 1,
            default_fill: [0.0; 4],
            clear_color: [0.0; 4],
            read_framebuffer: 0,
            draw_framebuffer: 0,
            renderbuffer: 0,
            transform_feedback: 0,
            transform_feedback_active: false,
        };

        HeadlessDriver {
            version: "4.5.0 Headless".to_owned(),
            vendor: "crayon".to_owned(),
            renderer: "Headless".to_owned(),
            extensions: Vec::new(),
            integers,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Overrides the `GL_VERSION` string, e.g. `"3.3.0 Headless"`.
    pub fn with_version<T: Into<String>>(mut self, version: T) -> Self {
        self.version = version.into();
        self
    }

    /// Advertises extensions on top of those implied by the version.
    pub fn with_extensions<T: AsRef<str>>(mut self, extensions: &[T]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|v| v.as_ref().to_owned()));
        self
    }

    /// Overrides an integer limit. Only the first value is used except for
    /// `MaxViewportDims`.
    pub fn with_integer(mut self, name: IntegerName, values: [i32; 2]) -> Self {
        self.integers.insert(name, values);
        self
    }

    pub fn recorder(&self) -> CallRecorder {
        CallRecorder {
            state: self.state.clone(),
        }
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn latch(&self, err: DriverError) {
        self.state.borrow_mut().errors.push_back(err);
    }

    fn allocate(&self, kind: ObjectKind, materialized: bool) -> ObjectId {
        let mut state = self.state.borrow_mut();
        if state.fail_next_allocation {
            state.fail_next_allocation = false;
            return 0;
        }

        let id = state.next_id;
        state.next_id += 1;
        state.objects.insert(id, HeadlessObject::new(kind, materialized));
        id
    }

    fn delete(&self, kind: ObjectKind, id: ObjectId) {
        let mut state = self.state.borrow_mut();
        let matches = state.objects.get(&id).map(|v| v.kind == kind).unwrap_or(false);
        if !matches {
            return;
        }

        state.objects.remove(&id);
        match kind {
            ObjectKind::Framebuffer => {
                if state.read_framebuffer == id {
                    state.read_framebuffer = 0;
                }

                if state.draw_framebuffer == id {
                    state.draw_framebuffer = 0;
                }
            }
            ObjectKind::Renderbuffer => {
                if state.renderbuffer == id {
                    state.renderbuffer = 0;
                }
            }
            ObjectKind::TransformFeedback => {
                if state.transform_feedback == id {
                    state.transform_feedback = 0;
                }
            }
            ObjectKind::Buffer => {}
        }
    }

    /// Binding a reserved name materializes the object. Unknown names are an
    /// error and leave the binding untouched.
    fn materialize(&self, kind: ObjectKind, id: ObjectId) -> bool {
        if id == 0 {
            return true;
        }

        let ok = match self.state.borrow_mut().objects.get_mut(&id) {
            Some(v) if v.kind == kind => {
                v.materialized = true;
                true
            }
            _ => false,
        };

        if !ok {
            self.latch(DriverError::InvalidOperation);
        }

        ok
    }

    /// Direct access requires an existing object of the right kind.
    fn expect_materialized(&self, kind: ObjectKind, id: ObjectId) -> bool {
        let ok = self
            .state
            .borrow()
            .objects
            .get(&id)
            .map(|v| v.kind == kind && v.materialized)
            .unwrap_or(id == 0 && kind == ObjectKind::Framebuffer);

        if !ok {
            self.latch(DriverError::InvalidOperation);
        }

        ok
    }

    fn bound_framebuffer(&self, target: FramebufferTarget) -> ObjectId {
        let state = self.state.borrow();
        match target {
            FramebufferTarget::Read => state.read_framebuffer,
            FramebufferTarget::Draw => state.draw_framebuffer,
        }
    }

    fn fill(&self, id: ObjectId) -> [f32; 4] {
        let state = self.state.borrow();
        if id == 0 {
            state.default_fill
        } else {
            state.objects.get(&id).map(|v| v.fill).unwrap_or([0.0; 4])
        }
    }

    fn set_fill(&self, id: ObjectId, fill: [f32; 4]) {
        let mut state = self.state.borrow_mut();
        if id == 0 {
            state.default_fill = fill;
        } else if let Some(v) = state.objects.get_mut(&id) {
            v.fill = fill;
        }
    }

    fn attach(&self, id: ObjectId, attachment: BufferAttachment, source: ObjectId) {
        if let Some(v) = self.state.borrow_mut().objects.get_mut(&id) {
            if source == 0 {
                v.attachments.remove(&attachment);
            } else {
                v.attachments.insert(attachment);
            }
        }
    }

    fn status(&self, id: ObjectId) -> FramebufferStatus {
        if id == 0 {
            return FramebufferStatus::Complete;
        }

        match self.state.borrow().objects.get(&id) {
            Some(v) if v.attachments.is_empty() => FramebufferStatus::IncompleteMissingAttachment,
            Some(_) => FramebufferStatus::Complete,
            None => FramebufferStatus::Undefined,
        }
    }

    fn blit(&self, read: ObjectId, draw: ObjectId, mask: BlitMask) {
        if mask.contains(BlitMask::COLOR) {
            let fill = self.fill(read);
            self.set_fill(draw, fill);
        }
    }

    fn read(&self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) {
        let fill = self.fill(self.bound_framebuffer(FramebufferTarget::Read));
        let pixel = image::pixel_size(format, ty);
        let n = rect.area().min(data.len() / pixel);

        for chunk in data.chunks_mut(pixel).take(n) {
            encode_pixel(fill, format, ty, chunk);
        }
    }
}

fn encode_pixel(fill: [f32; 4], format: PixelFormat, ty: PixelType, out: &mut [u8]) {
    for v in out.iter_mut() {
        *v = 0;
    }

    if ty.is_packed() {
        return;
    }

    let size = ty.size();
    for i in 0..format.components() {
        let v = fill[i.min(3)].max(0.0).min(1.0);
        let dst = &mut out[i * size..(i + 1) * size];
        match ty {
            PixelType::UnsignedByte => dst[0] = (v * 255.0).round() as u8,
            PixelType::Byte => dst[0] = (v * 127.0).round() as i8 as u8,
            PixelType::UnsignedShort => NativeEndian::write_u16(dst, (v * 65535.0).round() as u16),
            PixelType::Short => NativeEndian::write_i16(dst, (v * 32767.0).round() as i16),
            PixelType::UnsignedInt => {
                NativeEndian::write_u32(dst, (f64::from(v) * 4_294_967_295.0).round() as u32)
            }
            PixelType::Int => {
                NativeEndian::write_i32(dst, (f64::from(v) * 2_147_483_647.0).round() as i32)
            }
            PixelType::Float => NativeEndian::write_f32(dst, v),
            _ => {}
        }
    }
}

impl Driver for HeadlessDriver {
    fn get_string(&self, name: StringName) -> Option<String> {
        self.record(Call::GetString(name));
        match name {
            StringName::Vendor => Some(self.vendor.clone()),
            StringName::Renderer => Some(self.renderer.clone()),
            StringName::Version => Some(self.version.clone()),
            StringName::ShadingLanguageVersion => Some("4.50".to_owned()),
            StringName::Extensions => Some(self.extensions.join(" ")),
        }
    }

    fn get_string_indexed(&self, name: StringName, index: u32) -> Option<String> {
        self.record(Call::GetStringIndexed(name, index));
        match name {
            StringName::Extensions => self.extensions.get(index as usize).cloned(),
            _ => None,
        }
    }

    fn get_integer_v(&self, name: IntegerName, values: &mut [i32]) {
        self.record(Call::GetInteger(name));
        let src = match name {
            IntegerName::NumExtensions => [self.extensions.len() as i32, 0],
            _ => self.integers.get(&name).cloned().unwrap_or([0, 0]),
        };

        for (dst, v) in values.iter_mut().zip(src.iter()) {
            *dst = *v;
        }
    }

    fn get_error(&mut self) -> Option<DriverError> {
        self.record(Call::GetError);
        self.state.borrow_mut().errors.pop_front()
    }

    fn pack_alignment(&mut self, alignment: i32) {
        self.record(Call::PackAlignment(alignment));
    }

    fn clear_color(&mut self, color: [f32; 4]) {
        self.record(Call::ClearColor(color));
        self.state.borrow_mut().clear_color = color;
    }

    fn object_label(&mut self, kind: ObjectKind, id: ObjectId, label: &str) {
        self.record(Call::ObjectLabel(kind, id, label.to_owned()));
        if self.expect_materialized(kind, id) {
            if let Some(v) = self.state.borrow_mut().objects.get_mut(&id) {
                v.label = label.to_owned();
            }
        }
    }

    fn get_object_label(&self, kind: ObjectKind, id: ObjectId) -> String {
        self.record(Call::GetObjectLabel(kind, id));
        self.state
            .borrow()
            .objects
            .get(&id)
            .filter(|v| v.kind == kind)
            .map(|v| v.label.clone())
            .unwrap_or_default()
    }

    fn gen_framebuffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Framebuffer, false);
        self.record(Call::GenFramebuffer(id));
        id
    }

    fn create_framebuffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Framebuffer, true);
        self.record(Call::CreateFramebuffer(id));
        id
    }

    fn delete_framebuffer(&mut self, id: ObjectId) {
        self.record(Call::DeleteFramebuffer(id));
        self.delete(ObjectKind::Framebuffer, id);
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, id: ObjectId) {
        self.record(Call::BindFramebuffer(target, id));
        if self.materialize(ObjectKind::Framebuffer, id) {
            let mut state = self.state.borrow_mut();
            match target {
                FramebufferTarget::Read => state.read_framebuffer = id,
                FramebufferTarget::Draw => state.draw_framebuffer = id,
            }
        }
    }

    fn viewport(&mut self, rect: Rect) {
        self.record(Call::Viewport(rect));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.record(Call::Clear(mask));
        if mask.contains(ClearMask::COLOR) {
            let color = self.state.borrow().clear_color;
            let id = self.bound_framebuffer(FramebufferTarget::Draw);
            self.set_fill(id, color);
        }
    }

    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus {
        self.record(Call::CheckFramebufferStatus(target));
        let id = self.bound_framebuffer(target);
        self.status(id)
    }

    fn check_named_framebuffer_status(
        &mut self,
        id: ObjectId,
        target: FramebufferTarget,
    ) -> FramebufferStatus {
        self.record(Call::CheckNamedFramebufferStatus(id, target));
        self.status(id)
    }

    fn draw_buffers(&mut self, buffers: &[DrawAttachment]) {
        self.record(Call::DrawBuffers(buffers.to_vec()));
    }

    fn named_framebuffer_draw_buffers(&mut self, id: ObjectId, buffers: &[DrawAttachment]) {
        self.record(Call::NamedFramebufferDrawBuffers(id, buffers.to_vec()));
        self.expect_materialized(ObjectKind::Framebuffer, id);
    }

    fn read_buffer(&mut self, attachment: DrawAttachment) {
        self.record(Call::ReadBuffer(attachment));
    }

    fn named_framebuffer_read_buffer(&mut self, id: ObjectId, attachment: DrawAttachment) {
        self.record(Call::NamedFramebufferReadBuffer(id, attachment));
        self.expect_materialized(ObjectKind::Framebuffer, id);
    }

    fn invalidate_framebuffer(
        &mut self,
        target: FramebufferTarget,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    ) {
        self.record(Call::InvalidateFramebuffer(target, id, attachments.to_vec(), rect));
        if self.bound_framebuffer(target) != id {
            self.latch(DriverError::InvalidOperation);
        }
    }

    fn invalidate_named_framebuffer(
        &mut self,
        id: ObjectId,
        attachments: &[InvalidationAttachment],
        rect: Option<Rect>,
    ) {
        self.record(Call::InvalidateNamedFramebuffer(id, attachments.to_vec(), rect));
        self.expect_materialized(ObjectKind::Framebuffer, id);
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    ) {
        self.record(Call::FramebufferRenderbuffer(target, attachment, renderbuffer));
        let id = self.bound_framebuffer(target);
        self.attach(id, attachment, renderbuffer);
    }

    fn named_framebuffer_renderbuffer(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        renderbuffer: ObjectId,
    ) {
        self.record(Call::NamedFramebufferRenderbuffer(id, attachment, renderbuffer));
        if self.expect_materialized(ObjectKind::Framebuffer, id) {
            self.attach(id, attachment, renderbuffer);
        }
    }

    fn framebuffer_texture(
        &mut self,
        target: FramebufferTarget,
        attachment: BufferAttachment,
        texture: TextureTarget,
        id: ObjectId,
        level: i32,
    ) {
        self.record(Call::FramebufferTexture(target, attachment, texture, id, level));
        let framebuffer = self.bound_framebuffer(target);
        self.attach(framebuffer, attachment, id);
    }

    fn named_framebuffer_texture(
        &mut self,
        id: ObjectId,
        attachment: BufferAttachment,
        texture: TextureTarget,
        texture_id: ObjectId,
        level: i32,
    ) {
        self.record(Call::NamedFramebufferTexture(id, attachment, texture, texture_id, level));
        if self.expect_materialized(ObjectKind::Framebuffer, id) {
            self.attach(id, attachment, texture_id);
        }
    }

    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) {
        self.record(Call::ReadPixels(rect, format, ty));
        self.read(rect, format, ty, data);
    }

    fn read_n_pixels(&mut self, rect: Rect, format: PixelFormat, ty: PixelType, data: &mut [u8]) {
        self.record(Call::ReadNPixels(rect, format, ty, data.len()));
        if data.len() < image::data_size(format, ty, rect.size()) {
            self.latch(DriverError::InvalidOperation);
            return;
        }

        self.read(rect, format, ty, data);
    }

    fn blit_framebuffer(&mut self, src: Rect, dst: Rect, mask: BlitMask, filter: BlitFilter) {
        self.record(Call::BlitFramebuffer(src, dst, mask, filter));
        let read = self.bound_framebuffer(FramebufferTarget::Read);
        let draw = self.bound_framebuffer(FramebufferTarget::Draw);
        self.blit(read, draw, mask);
    }

    fn blit_named_framebuffer(
        &mut self,
        read: ObjectId,
        draw: ObjectId,
        src: Rect,
        dst: Rect,
        mask: BlitMask,
        filter: BlitFilter,
    ) {
        self.record(Call::BlitNamedFramebuffer(read, draw, src, dst, mask, filter));
        if self.expect_materialized(ObjectKind::Framebuffer, read)
            && self.expect_materialized(ObjectKind::Framebuffer, draw)
        {
            self.blit(read, draw, mask);
        }
    }

    fn gen_renderbuffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Renderbuffer, false);
        self.record(Call::GenRenderbuffer(id));
        id
    }

    fn create_renderbuffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Renderbuffer, true);
        self.record(Call::CreateRenderbuffer(id));
        id
    }

    fn delete_renderbuffer(&mut self, id: ObjectId) {
        self.record(Call::DeleteRenderbuffer(id));
        self.delete(ObjectKind::Renderbuffer, id);
    }

    fn bind_renderbuffer(&mut self, id: ObjectId) {
        self.record(Call::BindRenderbuffer(id));
        if self.materialize(ObjectKind::Renderbuffer, id) {
            self.state.borrow_mut().renderbuffer = id;
        }
    }

    fn renderbuffer_storage(&mut self, samples: i32, format: RenderbufferFormat, size: Vector2<i32>) {
        self.record(Call::RenderbufferStorage(samples, format, size));
        if self.state.borrow().renderbuffer == 0 {
            self.latch(DriverError::InvalidOperation);
        }
    }

    fn named_renderbuffer_storage(
        &mut self,
        id: ObjectId,
        samples: i32,
        format: RenderbufferFormat,
        size: Vector2<i32>,
    ) {
        self.record(Call::NamedRenderbufferStorage(id, samples, format, size));
        self.expect_materialized(ObjectKind::Renderbuffer, id);
    }

    fn gen_buffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Buffer, false);
        self.record(Call::GenBuffer(id));
        id
    }

    fn create_buffer(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::Buffer, true);
        self.record(Call::CreateBuffer(id));
        id
    }

    fn delete_buffer(&mut self, id: ObjectId) {
        self.record(Call::DeleteBuffer(id));
        self.delete(ObjectKind::Buffer, id);
    }

    fn bind_array_buffer(&mut self, id: ObjectId) {
        self.record(Call::BindArrayBuffer(id));
        self.materialize(ObjectKind::Buffer, id);
    }

    fn buffer_data(&mut self, data: &[u8], usage: BufferUsage) {
        self.record(Call::BufferData(data.len(), usage));
    }

    fn named_buffer_data(&mut self, id: ObjectId, data: &[u8], usage: BufferUsage) {
        self.record(Call::NamedBufferData(id, data.len(), usage));
        self.expect_materialized(ObjectKind::Buffer, id);
    }

    fn gen_transform_feedback(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::TransformFeedback, false);
        self.record(Call::GenTransformFeedback(id));
        id
    }

    fn create_transform_feedback(&mut self) -> ObjectId {
        let id = self.allocate(ObjectKind::TransformFeedback, true);
        self.record(Call::CreateTransformFeedback(id));
        id
    }

    fn delete_transform_feedback(&mut self, id: ObjectId) {
        self.record(Call::DeleteTransformFeedback(id));
        self.delete(ObjectKind::TransformFeedback, id);
    }

    fn bind_transform_feedback(&mut self, id: ObjectId) {
        self.record(Call::BindTransformFeedback(id));
        if self.state.borrow().transform_feedback_active {
            self.latch(DriverError::InvalidOperation);
            return;
        }

        if self.materialize(ObjectKind::TransformFeedback, id) {
            self.state.borrow_mut().transform_feedback = id;
        }
    }

    fn bind_transform_feedback_buffer(
        &mut self,
        index: u32,
        buffer: ObjectId,
        range: Option<(isize, isize)>,
    ) {
        self.record(Call::BindTransformFeedbackBuffer(index, buffer, range));
    }

    fn transform_feedback_buffer(
        &mut self,
        id: ObjectId,
        index: u32,
        buffer: ObjectId,
        range: Option<(isize, isize)>,
    ) {
        self.record(Call::TransformFeedbackBuffer(id, index, buffer, range));
        self.expect_materialized(ObjectKind::TransformFeedback, id);
    }

    fn begin_transform_feedback(&mut self, mode: PrimitiveMode) {
        self.record(Call::BeginTransformFeedback(mode));
        let mut state = self.state.borrow_mut();
        if state.transform_feedback_active {
            state.errors.push_back(DriverError::InvalidOperation);
        } else {
            state.transform_feedback_active = true;
        }
    }

    fn pause_transform_feedback(&mut self) {
        self.record(Call::PauseTransformFeedback);
    }

    fn resume_transform_feedback(&mut self) {
        self.record(Call::ResumeTransformFeedback);
    }

    fn end_transform_feedback(&mut self) {
        self.record(Call::EndTransformFeedback);
        let mut state = self.state.borrow_mut();
        if state.transform_feedback_active {
            state.transform_feedback_active = false;
        } else {
            state.errors.push_back(DriverError::InvalidOperation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let mut out = [0u8; 4];
        encode_pixel([1.0, 0.0, 0.5, 2.0], PixelFormat::RGBA, PixelType::UnsignedByte, &mut out);
        assert_eq!(out, [255, 0, 128, 255]);

        let mut out = [0xffu8; 4];
        encode_pixel([0.5; 4], PixelFormat::Red, PixelType::Float, &mut out);
        assert_eq!(NativeEndian::read_f32(&out), 0.5);
    }

    #[test]
    fn bind_materializes() {
        let mut driver = HeadlessDriver::new();
        let recorder = driver.recorder();

        let id = driver.gen_framebuffer();
        assert!(recorder.is_alive(id));
        assert!(!recorder.is_materialized(id));

        driver.bind_framebuffer(FramebufferTarget::Draw, id);
        assert!(recorder.is_materialized(id));
        assert_eq!(recorder.framebuffer_bindings(), (0, id));

        driver.delete_framebuffer(id);
        assert!(!recorder.is_alive(id));
        assert_eq!(recorder.framebuffer_bindings(), (0, 0));

        driver.bind_framebuffer(FramebufferTarget::Read, id);
        assert_eq!(driver.get_error(), Some(DriverError::InvalidOperation));
        assert_eq!(driver.get_error(), None);
    }
}
