//! Frame slot lifecycle: allocation, swap, selection, clearing, and
//! externally attached buffers.
//!
//! The swap protocol is: mark the draw slot ready, promote it to display,
//! copy it to the device framebuffer, then advance the draw index to the
//! next slot (optionally zeroing it). Draw and display indices never need
//! to differ by exactly one; `select_*` can point them anywhere.

use lumen_gfx::PixelBackend;
use lumen_types::{GfxError, Result, Rgb565};

use crate::{FbBackend, FrameSlot, MAX_BUFFERS, SlotMem};

/// What [`FbBackend::clear_buffer`] should clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    /// Every allocated frame slot (the device framebuffer in direct mode).
    All,
    /// The current draw target only.
    Draw,
    /// One specific slot by index.
    Slot(u8),
}

impl FbBackend {
    /// Switch to multi-buffered mode with `count` owned frame slots.
    ///
    /// Counts outside 1-3 are clamped to 2 (a count of 1 is valid: one
    /// off-screen slot presented on every swap). Any previously attached or
    /// allocated slots are released first. On allocation failure the backend
    /// falls back to direct device writes and the error is returned.
    pub fn enable_multi_buffer(&mut self, count: u8) -> Result<()> {
        let count = if (1..=MAX_BUFFERS).contains(&count) {
            count
        } else {
            log::warn!("buffer count {count} out of range, using 2");
            2
        };

        self.slots = [None, None, None];
        let len = self.width as usize * self.height as usize;
        for i in 0..count {
            let mut mem: Vec<u16> = Vec::new();
            if mem.try_reserve_exact(len).is_err() {
                self.reset_to_direct();
                log::warn!("frame slot {i} allocation failed, reverting to direct mode");
                return Err(GfxError::Alloc(format!(
                    "frame slot {i}: {len} pixels"
                )));
            }
            mem.resize(len, 0);
            self.slots[i as usize] = Some(FrameSlot {
                mem: SlotMem::Owned(mem),
                pitch_px: self.width as usize,
                ready: false,
            });
        }

        self.buffer_count = count;
        self.draw_index = 0;
        self.display_index = 0;
        self.multi_enabled = true;
        log::debug!("multi-buffering enabled: {count} slots");
        Ok(())
    }

    /// Release all frame slots and return to direct device writes.
    pub fn disable_multi_buffer(&mut self) {
        self.reset_to_direct();
    }

    fn reset_to_direct(&mut self) {
        self.slots = [None, None, None];
        self.buffer_count = 1;
        self.draw_index = 0;
        self.display_index = 0;
        self.multi_enabled = false;
    }

    /// Finish the current frame: promote the draw slot to display, present
    /// it to the device, and advance the draw index. `auto_clear` zeroes the
    /// new draw slot. No-op in direct mode.
    pub fn swap_buffers(&mut self, auto_clear: bool) {
        if !self.multi_enabled {
            log::trace!("swap_buffers in direct mode: nothing to do");
            return;
        }
        let draw = self.draw_index;
        if let Some(slot) = self.slots[draw as usize].as_mut() {
            slot.ready = true;
        }
        self.display_index = draw;
        self.present(draw);

        self.draw_index = (draw + 1) % self.buffer_count;
        if auto_clear {
            let width = self.width as usize;
            let height = self.height as usize;
            if let Some(slot) = self.slots[self.draw_index as usize].as_mut() {
                for y in 0..height {
                    if let Some(row) = slot.row_mut(y, width) {
                        row.fill(0);
                    }
                }
                slot.ready = false;
            }
        }
    }

    /// Redirect subsequent draws to slot `index`.
    pub fn select_draw_buffer(&mut self, index: u8) -> Result<()> {
        self.check_slot(index)?;
        self.draw_index = index;
        Ok(())
    }

    /// Present slot `index` to the device and keep it as the display slot.
    pub fn select_display_buffer(&mut self, index: u8) -> Result<()> {
        self.check_slot(index)?;
        self.display_index = index;
        self.present(index);
        Ok(())
    }

    /// Fill one or more buffers with a solid color.
    pub fn clear_buffer(&mut self, target: ClearTarget, color: Rgb565) -> Result<()> {
        match target {
            ClearTarget::Draw => {
                self.fill_screen(color);
                Ok(())
            }
            ClearTarget::All => {
                if !self.multi_enabled {
                    self.fill_screen(color);
                    return Ok(());
                }
                for index in 0..self.buffer_count {
                    if self.slots[index as usize].is_some() {
                        self.clear_slot(index, color);
                    }
                }
                Ok(())
            }
            ClearTarget::Slot(index) => {
                self.check_slot(index)?;
                self.clear_slot(index, color);
                Ok(())
            }
        }
    }

    /// Attach caller-owned pixel memory as frame slot `index`, replacing any
    /// slot already there and growing the buffer count to cover the index.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a writable region of at least
    /// `pitch_px * height` `u16` values that stays valid until the slot is
    /// detached, replaced, or the backend is dropped.
    pub unsafe fn attach_external_buffer(
        &mut self,
        index: u8,
        ptr: *mut u16,
        pitch_px: usize,
    ) -> Result<()> {
        if index >= MAX_BUFFERS {
            return Err(GfxError::Buffer(format!(
                "slot index {index} out of range (max {})",
                MAX_BUFFERS - 1
            )));
        }
        if ptr.is_null() {
            return Err(GfxError::Buffer("cannot attach a null buffer".into()));
        }
        if pitch_px < self.width as usize {
            return Err(GfxError::Buffer(format!(
                "pitch {pitch_px} px narrower than surface width {}",
                self.width
            )));
        }
        self.slots[index as usize] = Some(FrameSlot {
            mem: SlotMem::Borrowed(ptr),
            pitch_px,
            ready: false,
        });
        if index >= self.buffer_count {
            self.buffer_count = index + 1;
        }
        self.multi_enabled = true;
        Ok(())
    }

    /// Detach an externally attached slot, leaving it empty. Owned slots
    /// cannot be detached.
    pub fn detach_external_buffer(&mut self, index: u8) -> Result<()> {
        let external = match self.slots.get(index as usize).and_then(Option::as_ref) {
            None => return Err(GfxError::Buffer(format!("slot {index} is empty"))),
            Some(slot) => matches!(slot.mem, SlotMem::Borrowed(_)),
        };
        if !external {
            return Err(GfxError::Buffer(format!(
                "slot {index} is backend-owned, not external"
            )));
        }
        self.slots[index as usize] = None;
        Ok(())
    }

    /// Whether multi-buffering is active.
    pub fn is_multi_buffered(&self) -> bool {
        self.multi_enabled
    }

    /// Number of frame slots in rotation (1 in direct mode).
    pub fn buffer_count(&self) -> u8 {
        self.buffer_count
    }

    /// Index of the slot receiving draws.
    pub fn draw_index(&self) -> u8 {
        self.draw_index
    }

    /// Index of the slot last presented.
    pub fn display_index(&self) -> u8 {
        self.display_index
    }

    /// Whether slot `index` holds a completed frame.
    pub fn slot_ready(&self, index: u8) -> Option<bool> {
        self.slots
            .get(index as usize)?
            .as_ref()
            .map(|slot| slot.ready)
    }

    /// The pixels of slot `index`, `width * height`, without pitch padding.
    pub fn buffer(&self, index: u8) -> Option<Vec<u16>> {
        let slot = self.slots.get(index as usize)?.as_ref()?;
        let width = self.width as usize;
        let mut out = Vec::with_capacity(width * self.height as usize);
        for y in 0..self.height as usize {
            out.extend_from_slice(slot.row(y, width)?);
        }
        Some(out)
    }

    fn check_slot(&self, index: u8) -> Result<()> {
        if !self.multi_enabled {
            return Err(GfxError::Buffer(
                "multi-buffering is not enabled".into(),
            ));
        }
        if index >= self.buffer_count {
            return Err(GfxError::Buffer(format!(
                "slot index {index} out of range (count {})",
                self.buffer_count
            )));
        }
        if self.slots[index as usize].is_none() {
            return Err(GfxError::Buffer(format!("slot {index} is empty")));
        }
        Ok(())
    }

    fn clear_slot(&mut self, index: u8, color: Rgb565) {
        let width = self.width as usize;
        let height = self.height as usize;
        let raw = color.raw();
        if let Some(slot) = self.slots[index as usize].as_mut() {
            for y in 0..height {
                if let Some(row) = slot.row_mut(y, width) {
                    row.fill(raw);
                }
            }
            slot.ready = false;
        }
    }

    /// Copy slot `index` to the device framebuffer, honoring both pitches.
    fn present(&mut self, index: u8) {
        if self.device_fb.is_null() {
            return;
        }
        let width = self.width as usize;
        let device_pitch = self.device_pitch_px;
        let fb = self.device_fb;
        let Some(slot) = self.slots[index as usize].as_ref() else {
            return;
        };
        for y in 0..self.height as usize {
            let Some(src) = slot.row(y, width) else {
                break;
            };
            // SAFETY: the device contract guarantees `pitch * height` bytes
            // starting at `fb`; `y` stays below the native height.
            unsafe {
                std::ptr::copy_nonoverlapping(src.as_ptr(), fb.add(y * device_pitch), width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_device::TestDevice;

    fn backend(w: i16, h: i16) -> (TestDevice, FbBackend) {
        let device = TestDevice::new(w, h);
        let backend = FbBackend::new(&device);
        (device, backend)
    }

    #[test]
    fn enable_allocates_requested_slots() {
        let (_device, mut b) = backend(8, 8);
        b.enable_multi_buffer(3).unwrap();
        assert!(b.is_multi_buffered());
        assert_eq!(b.buffer_count(), 3);
        assert_eq!(b.draw_index(), 0);
        assert_eq!(b.display_index(), 0);
        for i in 0..3 {
            assert!(b.buffer(i).unwrap().iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn single_slot_mode_is_valid() {
        let (device, mut b) = backend(4, 4);
        b.enable_multi_buffer(1).unwrap();
        assert_eq!(b.buffer_count(), 1);
        b.write_pixel(1, 1, Rgb565::RED);
        // Off-screen until swapped.
        assert_eq!(device.pixel(1, 1), 0);
        b.swap_buffers(false);
        assert_eq!(device.pixel(1, 1), Rgb565::RED.raw());
        // One slot: draw index wraps back to 0.
        assert_eq!(b.draw_index(), 0);
    }

    #[test]
    fn out_of_range_counts_clamp_to_two() {
        let (_device, mut b) = backend(4, 4);
        b.enable_multi_buffer(0).unwrap();
        assert_eq!(b.buffer_count(), 2);
        b.enable_multi_buffer(5).unwrap();
        assert_eq!(b.buffer_count(), 2);
    }

    #[test]
    fn draws_go_off_screen_until_swap() {
        let (device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        b.write_pixel(2, 2, Rgb565::GREEN);
        assert_eq!(device.pixel(2, 2), 0);
        assert_eq!(b.read_pixel(2, 2), Rgb565::GREEN);

        assert_eq!(b.slot_ready(0), Some(false));
        b.swap_buffers(false);
        assert_eq!(device.pixel(2, 2), Rgb565::GREEN.raw());
        assert_eq!(b.display_index(), 0);
        assert_eq!(b.draw_index(), 1);
        assert_eq!(b.slot_ready(0), Some(true));
    }

    #[test]
    fn auto_clear_zeroes_the_next_draw_slot() {
        let (_device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        // Pre-dirty slot 1, then swap into it with auto-clear.
        b.select_draw_buffer(1).unwrap();
        b.write_pixel(0, 0, Rgb565::RED);
        b.select_draw_buffer(0).unwrap();
        b.swap_buffers(true);
        assert_eq!(b.draw_index(), 1);
        assert_eq!(b.read_pixel(0, 0), Rgb565(0));
    }

    #[test]
    fn without_auto_clear_the_next_slot_keeps_its_pixels() {
        let (_device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        b.select_draw_buffer(1).unwrap();
        b.write_pixel(0, 0, Rgb565::RED);
        b.select_draw_buffer(0).unwrap();
        b.swap_buffers(false);
        assert_eq!(b.read_pixel(0, 0), Rgb565::RED);
    }

    #[test]
    fn select_display_presents_immediately() {
        let (device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        b.select_draw_buffer(1).unwrap();
        b.write_pixel(3, 0, Rgb565::BLUE);
        b.select_display_buffer(1).unwrap();
        assert_eq!(device.pixel(3, 0), Rgb565::BLUE.raw());
        assert_eq!(b.display_index(), 1);
    }

    #[test]
    fn selection_validates_index_and_mode() {
        let (_device, mut b) = backend(4, 4);
        assert!(b.select_draw_buffer(0).is_err());
        b.enable_multi_buffer(2).unwrap();
        assert!(b.select_draw_buffer(2).is_err());
        assert!(b.select_display_buffer(2).is_err());
        assert!(b.select_draw_buffer(1).is_ok());
    }

    #[test]
    fn clear_targets() {
        let (_device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        b.write_pixel(0, 0, Rgb565::RED);
        b.select_draw_buffer(1).unwrap();
        b.write_pixel(1, 1, Rgb565::RED);
        b.select_draw_buffer(0).unwrap();

        b.clear_buffer(ClearTarget::Draw, Rgb565::BLUE).unwrap();
        assert_eq!(b.read_pixel(0, 0), Rgb565::BLUE);
        assert_eq!(b.buffer(1).unwrap()[5], Rgb565::RED.raw());

        b.clear_buffer(ClearTarget::Slot(1), Rgb565::GREEN).unwrap();
        assert!(b.buffer(1).unwrap().iter().all(|&p| p == Rgb565::GREEN.raw()));

        b.clear_buffer(ClearTarget::All, Rgb565::BLACK).unwrap();
        assert!(b.buffer(0).unwrap().iter().all(|&p| p == 0));
        assert!(b.buffer(1).unwrap().iter().all(|&p| p == 0));

        assert!(b.clear_buffer(ClearTarget::Slot(2), Rgb565::RED).is_err());
    }

    #[test]
    fn clear_in_direct_mode_hits_the_device() {
        let (device, mut b) = backend(2, 2);
        b.clear_buffer(ClearTarget::All, Rgb565::WHITE).unwrap();
        assert_eq!(device.pixel(1, 1), Rgb565::WHITE.raw());
    }

    #[test]
    fn attach_external_buffer_semantics() {
        let (_device, mut b) = backend(4, 4);
        let mut external = vec![0u16; 16];
        let ptr = external.as_mut_ptr();

        // SAFETY: `external` outlives the backend usage below.
        unsafe {
            assert!(b.attach_external_buffer(3, ptr, 4).is_err());
            assert!(b.attach_external_buffer(0, std::ptr::null_mut(), 4).is_err());
            assert!(b.attach_external_buffer(0, ptr, 2).is_err());
            b.attach_external_buffer(1, ptr, 4).unwrap();
        }
        assert!(b.is_multi_buffered());
        assert_eq!(b.buffer_count(), 2);

        b.select_draw_buffer(1).unwrap();
        b.write_pixel(2, 1, Rgb565::RED);
        assert_eq!(external[4 + 2], Rgb565::RED.raw());

        b.detach_external_buffer(1).unwrap();
        assert!(b.select_draw_buffer(1).is_err());
    }

    #[test]
    fn detach_rejects_owned_slots() {
        let (_device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        assert!(b.detach_external_buffer(0).is_err());
        assert!(b.detach_external_buffer(2).is_err());
    }

    #[test]
    fn present_honors_device_pitch() {
        let device = TestDevice::with_pitch(4, 2, 8);
        let mut b = FbBackend::new(&device);
        b.enable_multi_buffer(2).unwrap();
        b.write_pixel(0, 1, Rgb565::RED);
        b.swap_buffers(false);
        assert_eq!(device.pixel(0, 1), Rgb565::RED.raw());
        assert_eq!(device.pixel(4, 0), 0);
    }

    #[test]
    fn disable_returns_to_direct_mode() {
        let (device, mut b) = backend(4, 4);
        b.enable_multi_buffer(2).unwrap();
        b.disable_multi_buffer();
        assert!(!b.is_multi_buffered());
        b.write_pixel(0, 0, Rgb565::RED);
        assert_eq!(device.pixel(0, 0), Rgb565::RED.raw());
    }
}
