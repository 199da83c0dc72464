use std::sync::Arc;
use std::thread;
use crate::error::Error as OclError;
use crate::host::{DeviceSpec, HostContext};
use crate::standard::{Buffer, Context, Event};
use super::{assert_err, random_bytes};

const DATASET_SIZE: usize = 2 << 12;

#[test]
fn buffer_copy() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();

    let src_vec = random_bytes(DATASET_SIZE);
    let src_buffer = context.create_buffer_from_host(&src_vec).unwrap();
    let dst_buffer = context.create_buffer(DATASET_SIZE).unwrap();

    // Copy src_buffer to dst_buffer:
    let copy_range = (153, 3000);
    let event = src_buffer.copy_to(&queue, &dst_buffer, copy_range.0, copy_range.0,
        copy_range.1 - copy_range.0).unwrap();
    event.wait_for().unwrap();

    let mut dst_vec = vec![0u8; DATASET_SIZE];
    dst_buffer.read(&queue, 0, &mut dst_vec).unwrap();

    for i in 0..DATASET_SIZE {
        if i >= copy_range.0 && i < copy_range.1 {
            assert_eq!(dst_vec[i], src_vec[i]);
        } else {
            assert!(dst_vec[i] == 0, "dst_vec: {}, idx: {}", dst_vec[i], i);
        }
    }
}

#[test]
fn buffer_copy_within_itself() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let buffer = context.create_buffer_from_host(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

    buffer.copy_to(&queue, &buffer, 0, 2, 4).unwrap();

    let mut out = [0u8; 8];
    buffer.read(&queue, 0, &mut out).unwrap();
    assert_eq!(out, [1, 2, 1, 2, 3, 4, 7, 8]);
}

#[test]
fn host_data_is_copied() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let mut data = vec![5u8; 4];
    let buffer = context.create_buffer_from_host(&data).unwrap();
    data[0] = 0;

    let mut out = [0u8; 4];
    buffer.read(&queue, 0, &mut out).unwrap();
    assert_eq!(out, [5u8; 4]);
}

#[test]
fn out_of_bounds_access() {
    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let a = context.create_buffer(16).unwrap();
    let b = context.create_buffer(8).unwrap();

    let is_oob = |e: &OclError| match *e { OclError::OutOfBounds { .. } => true, _ => false };
    assert_err(a.read(&queue, 12, &mut [0u8; 8]), is_oob);
    assert_err(a.write(&queue, 17, &[]), is_oob);
    assert_err(a.copy_to(&queue, &b, 0, 4, 8), is_oob);
    assert_err(a.write(&queue, usize::max_value(), &[1]), is_oob);
    a.write(&queue, 16, &[]).unwrap();
}

#[test]
fn allocation_limit() {
    let context = HostContext::builder()
        .device(DeviceSpec::new("big").global_mem_size(1 << 20))
        .device(DeviceSpec::new("small").global_mem_size(1024))
        .build().unwrap();

    context.create_buffer(1024).unwrap();
    assert_err(context.create_buffer(1025), |e| match *e {
        OclError::OutOfResources { requested: 1025, available: 1024 } => true,
        _ => false,
    });
    assert!(context.create_buffer_from_host(&[0u8; 2048]).is_err());
}

#[test]
fn queue_of_another_context() {
    let context = HostContext::new().unwrap();
    let other = HostContext::new().unwrap();
    let buffer = context.create_buffer(4).unwrap();
    let foreign_queue = other.create_queue().unwrap();

    assert!(buffer.write(&foreign_queue, 0, &[1, 2, 3, 4]).is_err());
}

#[test]
fn opposing_copies_on_two_threads() {
    const ITERS: usize = 20_000;

    let context = HostContext::new().unwrap();
    let queue = context.create_queue().unwrap();
    let a = Arc::new(context.create_buffer_from_host(&[1u8; 4096]).unwrap());
    let b = Arc::new(context.create_buffer_from_host(&[2u8; 4096]).unwrap());

    let threads: Vec<_> = vec![(a.clone(), b.clone()), (b.clone(), a.clone())].into_iter()
        .map(|(src, dst)| {
            let queue = queue.clone();
            thread::spawn(move || {
                for _ in 0..ITERS {
                    src.copy_to(&queue, &dst, 0, 0, 4096).unwrap();
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }

    let mut out = vec![0u8; 4096];
    a.read(&queue, 0, &mut out).unwrap();
    assert!(out.iter().all(|&v| v == out[0]));
}
