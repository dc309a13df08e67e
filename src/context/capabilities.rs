use std::cmp;

use crate::backends::{Driver, IntegerName, StringName};
use crate::errors::*;

const CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT: i32 = 0x0000_0001;
const CONTEXT_FLAG_DEBUG_BIT: i32 = 0x0000_0002;
const CONTEXT_CORE_PROFILE_BIT: i32 = 0x0000_0001;
const CONTEXT_COMPATIBILITY_PROFILE_BIT: i32 = 0x0000_0002;

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Obtains the version of the context behind `driver`.
    pub fn query(driver: &dyn Driver) -> Result<Version> {
        let desc = driver
            .get_string(StringName::Version)
            .ok_or_else(|| Error::MalformedString("GL_VERSION", String::new()))?;

        Version::parse(&desc)
    }

    /// Parses a `GL_VERSION` string, e.g. `"4.5.0 NVIDIA 390.77"` or
    /// `"OpenGL ES 3.0 Mesa 18.0.5"`.
    pub fn parse(desc: &str) -> Result<Version> {
        let malformed = || Error::MalformedString("GL_VERSION", desc.to_owned());

        let (es, version) = if desc.starts_with("OpenGL ES-") {
            // "OpenGL ES-CM 1.1", the profile name comes before the version.
            (true, desc.split(' ').nth(2))
        } else if desc.starts_with("OpenGL ES ") {
            (true, desc[10..].split(' ').next())
        } else {
            (false, desc.split(' ').next())
        };

        let version = version.ok_or_else(malformed)?;
        let mut iter = version.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse::<u8>().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }
}

macro_rules! extensions {
    ($($string:literal => $field:ident [$($core:expr),*],)+) => {
        /// Contains data about the list of extensions.
        ///
        /// An extension which is part of the context version is reported as
        /// supported even if the driver does not advertise it, unless it was
        /// explicitly disabled.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            /// Returns the list of extensions supported by the context behind `driver`.
            ///
            /// The version must match the one of the context.
            pub fn query(driver: &dyn Driver, version: Version) -> Result<Extensions> {
                let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let num = driver.get_integer(IntegerName::NumExtensions);
                    (0 .. num.max(0) as u32)
                        .filter_map(|i| driver.get_string_indexed(StringName::Extensions, i))
                        .collect()
                } else {
                    let list = driver
                        .get_string(StringName::Extensions)
                        .ok_or_else(|| Error::MalformedString("GL_EXTENSIONS", String::new()))?;
                    list.split(' ').filter(|e| !e.is_empty()).map(|e| e.to_owned()).collect()
                };

                let mut extensions = Extensions::default();
                for extension in strings {
                    extensions.set(&extension, true);
                }

                extensions.promote(version);
                Ok(extensions)
            }

            /// Marks every extension that is part of `version` as supported.
            pub fn promote(&mut self, version: Version) {
                $(
                    let core: &[Version] = &[$($core),*];
                    if core.iter().any(|v| version >= *v) {
                        self.$field = true;
                    }
                )+
            }

            /// Sets the support flag of an extension by its name. Returns false if
            /// the name is not tracked.
            pub fn set(&mut self, name: &str, supported: bool) -> bool {
                match name {
                    $(
                        $string => {
                            self.$field = supported;
                            true
                        }
                    )+
                    _ => false,
                }
            }

            /// Checks whether the named extension is supported.
            pub fn is_supported(&self, name: &str) -> bool {
                match name {
                    $(
                        $string => self.$field,
                    )+
                    _ => false,
                }
            }

            /// Iterates over all tracked extensions and their support flag.
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
                vec![$(($string, self.$field),)+].into_iter()
            }
        }
    }
}

extensions! {
    "GL_ARB_framebuffer_object" => gl_arb_framebuffer_object [Version::GL(3, 0), Version::ES(2, 0)],
    "GL_EXT_framebuffer_object" => gl_ext_framebuffer_object [],
    "GL_EXT_framebuffer_blit" => gl_ext_framebuffer_blit [],
    "GL_ANGLE_framebuffer_blit" => gl_angle_framebuffer_blit [],
    "GL_NV_framebuffer_blit" => gl_nv_framebuffer_blit [Version::ES(3, 0)],
    "GL_ARB_draw_buffers" => gl_arb_draw_buffers [Version::GL(2, 0)],
    "GL_EXT_draw_buffers" => gl_ext_draw_buffers [Version::ES(3, 0)],
    "GL_NV_draw_buffers" => gl_nv_draw_buffers [],
    "GL_NV_read_buffer" => gl_nv_read_buffer [Version::ES(3, 0)],
    "GL_NV_fbo_color_attachments" => gl_nv_fbo_color_attachments [],
    "GL_ARB_direct_state_access" => gl_arb_direct_state_access [Version::GL(4, 5)],
    "GL_ARB_robustness" => gl_arb_robustness [],
    "GL_KHR_robustness" => gl_khr_robustness [Version::GL(4, 5), Version::ES(3, 2)],
    "GL_EXT_robustness" => gl_ext_robustness [],
    "GL_ARB_invalidate_subdata" => gl_arb_invalidate_subdata [Version::GL(4, 3), Version::ES(3, 0)],
    "GL_KHR_debug" => gl_khr_debug [Version::GL(4, 3), Version::ES(3, 2)],
    "GL_ARB_transform_feedback2" => gl_arb_transform_feedback2 [Version::GL(4, 0), Version::ES(3, 0)],
    "GL_ARB_texture_multisample" => gl_arb_texture_multisample [Version::GL(3, 2), Version::ES(3, 1)],
}

/// Capabilities which are derived from the version and the extension list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Feature {
    FramebufferObject,
    FramebufferBlit,
    DrawBuffers,
    ReadBuffer,
    DirectStateAccess,
    Robustness,
    Invalidate,
    DebugLabel,
    TransformFeedback,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,

    /// The list of OpenGL extensions support by this implementation.
    pub extensions: Extensions,

    /// Names of the extensions that were force-disabled.
    pub disabled: Vec<String>,

    /// The OpenGL context profile if available.
    ///
    /// The context profile is available from OpenGL 3.2 onwards. `None` if not supported.
    pub profile: Option<Profile>,

    /// The context is in debug mode, which may have additional error and performance issue
    /// reporting functionality.
    pub debug: bool,

    /// The context is in "forward-compatible" mode, which means that no deprecated functionality
    /// will be supported.
    pub forward_compatible: bool,

    /// Maximum width and height of `glViewport`.
    pub max_viewport_dims: (i32, i32),

    /// Maximum number of color attachment bind points.
    pub max_color_attachments: i32,

    /// Maximum number of simultaneous fragment outputs.
    pub max_draw_buffers: i32,

    /// Maximum width and height of a renderbuffer.
    pub max_renderbuffer_size: i32,

    /// Maximum number of samples of a multisample renderbuffer.
    pub max_samples: i32,

    /// Limits of transform feedback, all zero if unsupported.
    pub max_transform_feedback_separate_attributes: i32,
    pub max_transform_feedback_interleaved_components: i32,
    pub max_transform_feedback_buffers: i32,
}

impl Capabilities {
    /// Queries the capabilities of the context behind `driver`. Extensions
    /// listed in `disabled` are reported as unsupported.
    ///
    /// Only read-only queries are issued.
    pub fn query<T: AsRef<str>>(driver: &dyn Driver, disabled: &[T]) -> Result<Capabilities> {
        let version = Version::query(driver)?;
        let mut extensions = Extensions::query(driver, version)?;

        let mut names = Vec::new();
        for v in disabled {
            if extensions.set(v.as_ref(), false) {
                names.push(v.as_ref().to_owned());
            } else {
                warn!("[GL] Can not disable unknown extension {}.", v.as_ref());
            }
        }

        let (debug, forward_compatible) = if version >= Version::GL(3, 0) {
            let val = driver.get_integer(IntegerName::ContextFlags);
            (
                (val & CONTEXT_FLAG_DEBUG_BIT) != 0,
                (val & CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT) != 0,
            )
        } else {
            (false, false)
        };

        let mut caps = Capabilities {
            version,
            extensions,
            disabled: names,
            vendor: driver.get_string(StringName::Vendor).unwrap_or_default(),
            renderer: driver.get_string(StringName::Renderer).unwrap_or_default(),
            profile: Capabilities::parse_profile(driver, version),
            debug,
            forward_compatible,
            max_viewport_dims: Capabilities::parse_viewport_dims(driver),
            max_color_attachments: 0,
            max_draw_buffers: 1,
            max_renderbuffer_size: driver.get_integer(IntegerName::MaxRenderbufferSize),
            max_samples: 0,
            max_transform_feedback_separate_attributes: 0,
            max_transform_feedback_interleaved_components: 0,
            max_transform_feedback_buffers: 0,
        };

        caps.max_color_attachments = caps.parse_color_attachments(driver);

        if caps.supports(Feature::DrawBuffers) {
            caps.max_draw_buffers = driver.get_integer(IntegerName::MaxDrawBuffers);
        }

        if caps.supports(Feature::FramebufferBlit) {
            caps.max_samples = driver.get_integer(IntegerName::MaxSamples);
        }

        if caps.supports(Feature::TransformFeedback) {
            caps.max_transform_feedback_separate_attributes =
                driver.get_integer(IntegerName::MaxTransformFeedbackSeparateAttribs);
            caps.max_transform_feedback_interleaved_components =
                driver.get_integer(IntegerName::MaxTransformFeedbackInterleavedComponents);
            caps.max_transform_feedback_buffers = if caps.version >= Version::GL(4, 0) {
                driver.get_integer(IntegerName::MaxTransformFeedbackBuffers)
            } else {
                caps.max_transform_feedback_separate_attributes
            };
        }

        Ok(caps)
    }

    /// Checks if the named extension is supported. Unknown names are not.
    #[inline]
    pub fn is_extension_supported(&self, name: &str) -> bool {
        self.extensions.is_supported(name)
    }

    /// Checks if the named extension was disabled by the context params.
    #[inline]
    pub fn is_extension_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|v| v == name)
    }

    pub fn supports(&self, feature: Feature) -> bool {
        let exts = &self.extensions;
        match feature {
            Feature::FramebufferObject => {
                exts.gl_arb_framebuffer_object || exts.gl_ext_framebuffer_object
            }
            Feature::FramebufferBlit => {
                (exts.gl_arb_framebuffer_object && !self.is_es2())
                    || exts.gl_ext_framebuffer_blit
                    || exts.gl_angle_framebuffer_blit
                    || exts.gl_nv_framebuffer_blit
            }
            Feature::DrawBuffers => {
                exts.gl_arb_draw_buffers || exts.gl_ext_draw_buffers || exts.gl_nv_draw_buffers
            }
            Feature::ReadBuffer => self.version >= Version::GL(1, 0) || exts.gl_nv_read_buffer,
            Feature::DirectStateAccess => exts.gl_arb_direct_state_access,
            Feature::Robustness => {
                exts.gl_khr_robustness || exts.gl_arb_robustness || exts.gl_ext_robustness
            }
            Feature::Invalidate => exts.gl_arb_invalidate_subdata,
            Feature::DebugLabel => exts.gl_khr_debug,
            Feature::TransformFeedback => exts.gl_arb_transform_feedback2,
        }
    }

    fn is_es2(&self) -> bool {
        self.version >= Version::ES(2, 0) && self.version < Version::ES(3, 0)
    }

    fn parse_viewport_dims(driver: &dyn Driver) -> (i32, i32) {
        let mut val = [0, 0];
        driver.get_integer_v(IntegerName::MaxViewportDims, &mut val);
        (val[0], val[1])
    }

    fn parse_profile(driver: &dyn Driver, version: Version) -> Option<Profile> {
        if version >= Version::GL(3, 2) {
            let val = driver.get_integer(IntegerName::ContextProfileMask);
            if (val & CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
                Some(Profile::Compatibility)
            } else if (val & CONTEXT_CORE_PROFILE_BIT) != 0 {
                Some(Profile::Core)
            } else {
                None
            }
        } else {
            None
        }
    }

    fn parse_color_attachments(&self, driver: &dyn Driver) -> i32 {
        if self.version >= Version::GL(3, 0)
            || self.version >= Version::ES(3, 0)
            || (self.extensions.gl_arb_framebuffer_object && !self.is_es2())
            || self.extensions.gl_ext_framebuffer_object
            || self.extensions.gl_nv_fbo_color_attachments
        {
            driver.get_integer(IntegerName::MaxColorAttachments)
        } else if self.version >= Version::ES(2, 0) {
            1
        } else {
            0
        }
    }
}

/// Rejects contexts which lack the functionality every implementation
/// variant relies on.
pub fn check_capabilities(caps: &Capabilities) -> Result<()> {
    if !caps.supports(Feature::FramebufferObject) {
        return Err(Error::Requirement("framebuffer objects".into()));
    }

    if !caps.supports(Feature::FramebufferBlit) {
        return Err(Error::Requirement("blitting framebuffer".into()));
    }

    Ok(())
}
