//! Fixed-capacity particle arena with a FIFO free list

use std::collections::VecDeque;

use crate::emitter::{EmitterId, ParticleEmitter};
use crate::particle::Particle;

/// Occupancy snapshot of one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub in_use: usize,
    pub available: usize,
}

/// All particles one emitter can ever have alive at once
///
/// Every slot is allocated when the pool is created; spawning and releasing
/// only move slot indices between the free list and the in-use set.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    emitter: EmitterId,
    particles: Vec<Particle>,
    /// Slots ready for reuse, oldest release first
    available: VecDeque<u32>,
    /// `true` while the slot sits in `available`
    free: Vec<bool>,
}

impl ParticlePool {
    pub fn new(emitter: EmitterId, capacity: usize) -> Self {
        let particles = (0..capacity)
            .map(|slot| Particle::pooled(emitter, slot as u32))
            .collect();

        Self {
            emitter,
            particles,
            available: (0..capacity as u32).collect(),
            free: vec![true; capacity],
        }
    }

    pub fn emitter(&self) -> EmitterId {
        self.emitter
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn available(&self) -> usize {
        self.available.len()
    }

    pub fn in_use(&self) -> usize {
        self.particles.len() - self.available.len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            in_use: self.in_use(),
            available: self.available(),
        }
    }

    /// Take the oldest available slot and initialise it with `life`
    pub fn acquire(&mut self, life: f32) -> Option<&mut Particle> {
        let slot = self.available.pop_front()? as usize;
        self.free[slot] = false;

        let particle = &mut self.particles[slot];
        particle.init(self.emitter, life);
        Some(particle)
    }

    /// Return a slot to the free list
    ///
    /// Releasing a slot that is already available is ignored, so the
    /// free list never holds duplicates.
    pub fn release(&mut self, slot: u32) -> bool {
        let index = slot as usize;
        match self.free.get(index) {
            Some(false) => {
                self.free[index] = true;
                self.available.push_back(slot);
                true
            }
            Some(true) => {
                log::trace!("Slot {} of emitter {} already released", slot, self.emitter);
                false
            }
            None => false,
        }
    }

    /// Force-expire a particle and release its slot
    pub fn expire(&mut self, slot: u32) -> bool {
        if let Some(particle) = self.particles.get_mut(slot as usize) {
            if particle.is_in_use() {
                particle.set_life(-1.0);
            }
        }
        self.release(slot)
    }

    /// Force-expire and release every in-use particle
    pub fn release_all(&mut self) -> usize {
        (0..self.particles.len() as u32)
            .filter(|&slot| self.expire(slot))
            .count()
    }

    /// Advance every in-use particle, releasing those whose life ran out
    ///
    /// Returns the number of particles still alive.
    pub fn update(&mut self, emitter: &mut dyn ParticleEmitter, delta: f32) -> usize {
        for slot in 0..self.particles.len() {
            if self.free[slot] {
                continue;
            }
            if !self.particles[slot].update(emitter, delta) {
                self.release(slot as u32);
            }
        }
        self.in_use()
    }

    pub fn get(&self, slot: u32) -> Option<&Particle> {
        self.particles.get(slot as usize)
    }

    /// In-use particles in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles
            .iter()
            .zip(self.free.iter())
            .filter(|(_, free)| !**free)
            .map(|(particle, _)| particle)
    }

    /// Mutable access to in-use particles in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> + '_ {
        self.particles
            .iter_mut()
            .zip(self.free.iter())
            .filter(|(_, free)| !**free)
            .map(|(particle, _)| particle)
    }
}
