//! Color channels, channel masks and atlas formats.

use serde::{Deserialize, Serialize};

/// One color channel of an RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::R, Channel::G, Channel::B, Channel::A];

    /// Byte offset of this channel within an RGBA8 pixel.
    pub fn index(&self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::R => write!(f, "R"),
            Channel::G => write!(f, "G"),
            Channel::B => write!(f, "B"),
            Channel::A => write!(f, "A"),
        }
    }
}

fn enabled() -> bool {
    true
}

/// Which channels a bake pass writes. All channels by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelMask {
    #[serde(default = "enabled")]
    pub r: bool,
    #[serde(default = "enabled")]
    pub g: bool,
    #[serde(default = "enabled")]
    pub b: bool,
    #[serde(default = "enabled")]
    pub a: bool,
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl ChannelMask {
    pub const ALL: ChannelMask = ChannelMask::new(true, true, true, true);
    pub const NONE: ChannelMask = ChannelMask::new(false, false, false, false);
    pub const RGB: ChannelMask = ChannelMask::new(true, true, true, false);

    pub const fn new(r: bool, g: bool, b: bool, a: bool) -> Self {
        Self { r, g, b, a }
    }

    /// A mask holding exactly the given channels.
    pub fn of(channels: &[Channel]) -> Self {
        channels
            .iter()
            .fold(Self::NONE, |mask, &c| mask.with(c, true))
    }

    pub fn contains(&self, channel: Channel) -> bool {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
            Channel::A => self.a,
        }
    }

    pub fn with(mut self, channel: Channel, on: bool) -> Self {
        match channel {
            Channel::R => self.r = on,
            Channel::G => self.g = on,
            Channel::B => self.b = on,
            Channel::A => self.a = on,
        }
        self
    }

    /// The enabled channels, in RGBA order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    pub fn union(&self, other: ChannelMask) -> Self {
        Self::new(self.r || other.r, self.g || other.g, self.b || other.b, self.a || other.a)
    }

    pub fn difference(&self, other: ChannelMask) -> Self {
        Self::new(self.r && !other.r, self.g && !other.g, self.b && !other.b, self.a && !other.a)
    }
}

impl std::fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for channel in self.channels() {
            write!(f, "{}", channel)?;
        }
        Ok(())
    }
}

/// How many passes claim each channel of a texture slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelClaims {
    counts: [usize; 4],
}

impl ChannelClaims {
    pub fn from_masks<'a>(masks: impl IntoIterator<Item = &'a ChannelMask>) -> Self {
        let mut claims = Self::default();
        for mask in masks {
            claims.add(*mask);
        }
        claims
    }

    pub fn add(&mut self, mask: ChannelMask) {
        for channel in mask.channels() {
            self.counts[channel.index()] += 1;
        }
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.counts[channel.index()]
    }

    /// Channels claimed by at least one pass.
    pub fn claimed(&self) -> ChannelMask {
        self.mask_where(|n| n >= 1)
    }

    /// Channels claimed by more than one pass.
    pub fn collisions(&self) -> ChannelMask {
        self.mask_where(|n| n > 1)
    }

    /// Narrowest format holding every claimed channel.
    pub fn format(&self) -> TextureFormat {
        TextureFormat::for_channels(self.claimed())
    }

    fn mask_where(&self, keep: impl Fn(usize) -> bool) -> ChannelMask {
        Channel::ALL
            .into_iter()
            .fold(ChannelMask::NONE, |mask, c| mask.with(c, keep(self.count(c))))
    }
}

/// Pixel format of a generated atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    R8,
    RG16,
    RGB24,
    RGBA32,
}

impl TextureFormat {
    /// Pick a format by the highest channel in use: alpha needs RGBA, blue RGB,
    /// green RG, and anything else fits in a single red channel.
    pub fn for_channels(used: ChannelMask) -> Self {
        if used.a {
            TextureFormat::RGBA32
        } else if used.b {
            TextureFormat::RGB24
        } else if used.g {
            TextureFormat::RG16
        } else {
            TextureFormat::R8
        }
    }

    /// Channels stored by this format.
    pub fn channels(&self) -> ChannelMask {
        match self {
            TextureFormat::R8 => ChannelMask::new(true, false, false, false),
            TextureFormat::RG16 => ChannelMask::new(true, true, false, false),
            TextureFormat::RGB24 => ChannelMask::RGB,
            TextureFormat::RGBA32 => ChannelMask::ALL,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels().channels().count()
    }

    pub fn has_alpha(&self) -> bool {
        self.channels().a
    }
}

impl std::fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureFormat::R8 => write!(f, "R8"),
            TextureFormat::RG16 => write!(f, "RG16"),
            TextureFormat::RGB24 => write!(f, "RGB24"),
            TextureFormat::RGBA32 => write!(f, "RGBA32"),
        }
    }
}
