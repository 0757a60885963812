//! In-process scripted libvlc used by the unit tests.
//!
//! Every entry point records its call on a thread-local ledger, so tests
//! running in parallel never observe each other. Handles are fake,
//! never-dereferenced addresses.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::path::PathBuf;
use std::ptr;
use std::sync::Arc;

use libc::{c_char, c_int, c_uint, c_void};

use crate::api::{LibVlc, Symbols};
use crate::ffi::*;
use crate::handle::{LibraryHandle, NativeRef};

#[derive(Default)]
struct State {
    calls: HashMap<&'static str, usize>,
    sequence: Vec<&'static str>,
    next_handle: usize,
    fail_new: bool,
    fail_constructors: bool,
    fail_discoverer_start: bool,
    clock: i64,
    args: Vec<String>,
    cwd_at_new: Option<PathBuf>,
    mrls: HashMap<usize, String>,
    options: Vec<String>,
    list_additions: Vec<usize>,
    list_counts: HashMap<usize, c_int>,
    playing: HashMap<usize, bool>,
    running: HashMap<usize, bool>,
    audio_filters: Vec<[String; 4]>,
    video_filters: Vec<[String; 4]>,
    audio_outputs: Vec<(String, String)>,
    devices: Vec<(String, String)>,
    live_lists: usize,
    video_lock: Option<(libvlc_video_lock_cb, usize)>,
    video_format: Option<(String, u32, u32, u32)>,
    audio_play: Option<(libvlc_audio_play_cb, usize)>,
    attached: Vec<(c_int, libvlc_callback_t, usize)>,
    exit: Option<(libvlc_exit_cb, usize)>,
    discoverer_name: Option<String>,
    broadcasts: Vec<(String, c_int)>,
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

fn hit(name: &'static str) {
    STATE.with_borrow_mut(|s| {
        *s.calls.entry(name).or_default() += 1;
        s.sequence.push(name);
    });
}

fn with<R>(f: impl FnOnce(&mut State) -> R) -> R {
    STATE.with_borrow_mut(f)
}

fn alloc<T>() -> *mut T {
    with(|s| {
        s.next_handle += 0x100;
        (0x10_0000 + s.next_handle) as *mut T
    })
}

fn constructed<T>() -> *mut T {
    if with(|s| s.fail_constructors) {
        ptr::null_mut()
    } else {
        alloc()
    }
}

fn manager_of<T>(object: *mut T) -> *mut libvlc_event_manager_t {
    (object as usize + 0x8) as *mut libvlc_event_manager_t
}

unsafe fn read(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn owned_c(value: &str) -> *mut c_char {
    CString::new(value).unwrap().into_raw()
}

unsafe fn free_c(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

fn strdup(value: &str) -> *mut c_char {
    let value = CString::new(value).unwrap();
    unsafe { libc::strdup(value.as_ptr()) }
}

// ---------------------------------------------------------------------------
// Test controls
// ---------------------------------------------------------------------------

pub fn reset() {
    with(|s| *s = State::default());
}

pub fn calls(name: &str) -> usize {
    with(|s| s.calls.get(name).copied().unwrap_or(0))
}

pub fn total_calls() -> usize {
    with(|s| s.calls.values().sum())
}

pub fn sequence() -> Vec<&'static str> {
    with(|s| s.sequence.clone())
}

pub fn fake_handle<T>(addr: usize) -> *mut T {
    addr as *mut T
}

pub fn symbols() -> Symbols {
    Symbols {
        new: mock_new,
        retain: mock_retain,
        release: mock_release,
        get_version: mock_get_version,
        clock: mock_clock,
        delay: Some(mock_delay as _),
        free: mock_free,
        set_exit_handler: Some(mock_set_exit_handler as _),

        audio_filter_list_get: mock_audio_filter_list_get,
        video_filter_list_get: mock_video_filter_list_get,
        module_description_list_release: mock_module_description_list_release,
        audio_output_list_get: mock_audio_output_list_get,
        audio_output_list_release: mock_audio_output_list_release,
        audio_output_device_count: Some(mock_device_count as _),
        audio_output_device_longname: Some(mock_device_longname as _),
        audio_output_device_id: Some(mock_device_id as _),
        audio_output_device_list_get: Some(mock_device_list_get as _),
        audio_output_device_list_release: Some(mock_device_list_release as _),

        event_attach: mock_event_attach,
        event_detach: mock_event_detach,

        media_new_location: mock_media_new_location,
        media_new_path: mock_media_new_path,
        media_add_option: mock_media_add_option,
        media_retain: mock_media_retain,
        media_release: mock_media_release,
        media_get_mrl: mock_media_get_mrl,
        media_get_state: mock_media_get_state,
        media_event_manager: mock_media_event_manager,

        media_list_new: mock_media_list_new,
        media_list_retain: mock_media_list_retain,
        media_list_release: mock_media_list_release,
        media_list_add_media: mock_media_list_add_media,
        media_list_count: mock_media_list_count,
        media_list_lock: mock_media_list_lock,
        media_list_unlock: mock_media_list_unlock,
        media_list_event_manager: mock_media_list_event_manager,

        media_player_new: mock_player_new,
        media_player_retain: mock_player_retain,
        media_player_release: mock_player_release,
        media_player_set_media: mock_player_set_media,
        media_player_play: mock_player_play,
        media_player_pause: mock_player_pause,
        media_player_stop: mock_player_stop,
        media_player_is_playing: mock_player_is_playing,
        media_player_event_manager: mock_player_event_manager,

        video_set_callbacks: mock_video_set_callbacks,
        video_set_format: mock_video_set_format,
        video_set_format_callbacks: mock_video_set_format_callbacks,

        audio_set_callbacks: mock_audio_set_callbacks,
        audio_set_volume_callback: mock_audio_set_volume_callback,
        audio_set_format_callbacks: mock_audio_set_format_callbacks,
        audio_set_format: mock_audio_set_format,

        media_list_player_new: mock_list_player_new,
        media_list_player_retain: mock_list_player_retain,
        media_list_player_release: mock_list_player_release,
        media_list_player_set_media_list: mock_list_player_set_media_list,
        media_list_player_set_media_player: mock_list_player_set_media_player,
        media_list_player_play: mock_list_player_play,
        media_list_player_pause: mock_list_player_pause,
        media_list_player_stop: mock_list_player_stop,
        media_list_player_next: mock_list_player_next,
        media_list_player_event_manager: mock_list_player_event_manager,

        media_discoverer_new: mock_discoverer_new,
        media_discoverer_start: mock_discoverer_start,
        media_discoverer_stop: mock_discoverer_stop,
        media_discoverer_release: mock_discoverer_release,
        media_discoverer_is_running: mock_discoverer_is_running,
        media_discoverer_media_list: mock_discoverer_media_list,

        vlm_release: mock_vlm_release,
        vlm_add_broadcast: mock_vlm_add_broadcast,
        vlm_play_media: mock_vlm_play_media,
        vlm_stop_media: mock_vlm_stop_media,
        vlm_pause_media: mock_vlm_pause_media,
        vlm_del_media: mock_vlm_del_media,
        vlm_get_event_manager: mock_vlm_get_event_manager,
    }
}

pub fn api() -> Arc<LibVlc> {
    Arc::new(LibVlc::from_symbols(symbols()))
}

unsafe extern "C" fn forget_instance(_: *mut libvlc_instance_t) {}

/// A library handle over a fixed fake instance. Neither creating nor
/// dropping it records a call.
pub fn library() -> LibraryHandle {
    let api = api();
    let retain = api.symbols().retain;
    let instance = fake_handle::<libvlc_instance_t>(0x100);
    let handle =
        NativeRef::from_raw(api, instance, "library", Some(retain), forget_instance).unwrap();
    LibraryHandle::new(handle)
}

pub fn fail_new(fail: bool) {
    with(|s| s.fail_new = fail);
}

pub fn fail_constructors(fail: bool) {
    with(|s| s.fail_constructors = fail);
}

pub fn fail_discoverer_start(fail: bool) {
    with(|s| s.fail_discoverer_start = fail);
}

pub fn set_clock(now: i64) {
    with(|s| s.clock = now);
}

pub fn set_audio_filters(filters: &[(&str, &str, &str, &str)]) {
    let filters = filters
        .iter()
        .map(|(a, b, c, d)| [a.to_string(), b.to_string(), c.to_string(), d.to_string()])
        .collect();
    with(|s| s.audio_filters = filters);
}

pub fn set_audio_outputs(outputs: &[(&str, &str)]) {
    let outputs = outputs
        .iter()
        .map(|(name, description)| (name.to_string(), description.to_string()))
        .collect();
    with(|s| s.audio_outputs = outputs);
}

/// Devices as `(longname, id)` pairs, reported for every module.
pub fn set_devices(devices: &[(&str, &str)]) {
    let devices = devices
        .iter()
        .map(|(longname, id)| (longname.to_string(), id.to_string()))
        .collect();
    with(|s| s.devices = devices);
}

pub fn last_args() -> Vec<String> {
    with(|s| s.args.clone())
}

pub fn cwd_at_new() -> Option<PathBuf> {
    with(|s| s.cwd_at_new.clone())
}

pub fn options() -> Vec<String> {
    with(|s| s.options.clone())
}

pub fn list_additions() -> Vec<usize> {
    with(|s| s.list_additions.clone())
}

/// Native lists handed out and not yet released.
pub fn live_lists() -> usize {
    with(|s| s.live_lists)
}

pub fn video_lock() -> Option<(libvlc_video_lock_cb, usize)> {
    with(|s| s.video_lock)
}

pub fn video_format() -> Option<(String, u32, u32, u32)> {
    with(|s| s.video_format.clone())
}

pub fn audio_play() -> Option<(libvlc_audio_play_cb, usize)> {
    with(|s| s.audio_play)
}

pub fn attached() -> usize {
    with(|s| s.attached.len())
}

/// Deliver an event of type `type_` to every handler attached for it.
pub fn fire(type_: c_int, u: libvlc_event_u) {
    let targets: Vec<_> = with(|s| {
        s.attached
            .iter()
            .filter(|(ty, _, _)| *ty == type_)
            .map(|(_, cb, data)| (*cb, *data))
            .collect()
    });
    let event = libvlc_event_t {
        type_,
        p_obj: ptr::null_mut(),
        u,
    };
    for (cb, data) in targets {
        unsafe { cb(&event, data as *mut c_void) };
    }
}

pub fn has_exit_handler() -> bool {
    with(|s| s.exit.is_some())
}

pub fn trigger_exit() {
    if let Some((cb, opaque)) = with(|s| s.exit) {
        unsafe { cb(opaque as *mut c_void) };
    }
}

pub fn last_discoverer_name() -> Option<String> {
    with(|s| s.discoverer_name.clone())
}

pub fn broadcasts() -> Vec<(String, c_int)> {
    with(|s| s.broadcasts.clone())
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_new(argc: c_int, argv: *const *const c_char) -> *mut libvlc_instance_t {
    hit("libvlc_new");
    let args = (0..argc as usize)
        .map(|i| unsafe { read(*argv.add(i)) })
        .collect();
    let cwd = std::env::current_dir().ok();
    let fail = with(|s| {
        s.args = args;
        s.cwd_at_new = cwd;
        s.fail_new
    });
    if fail { ptr::null_mut() } else { alloc() }
}

unsafe extern "C" fn mock_retain(_: *mut libvlc_instance_t) {
    hit("libvlc_retain");
}

unsafe extern "C" fn mock_release(_: *mut libvlc_instance_t) {
    hit("libvlc_release");
}

unsafe extern "C" fn mock_get_version() -> *const c_char {
    hit("libvlc_get_version");
    c"3.0.20 Vetinari".as_ptr()
}

unsafe extern "C" fn mock_clock() -> i64 {
    hit("libvlc_clock");
    with(|s| s.clock)
}

unsafe extern "C" fn mock_delay(pts: i64) -> i64 {
    hit("libvlc_delay");
    pts - with(|s| s.clock)
}

unsafe extern "C" fn mock_free(ptr: *mut c_void) {
    hit("libvlc_free");
    unsafe { libc::free(ptr) };
}

unsafe extern "C" fn mock_set_exit_handler(
    _: *mut libvlc_instance_t,
    cb: Option<libvlc_exit_cb>,
    opaque: *mut c_void,
) {
    hit("libvlc_set_exit_handler");
    with(|s| s.exit = cb.map(|cb| (cb, opaque as usize)));
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

fn module_list(entries: &[[String; 4]]) -> *mut libvlc_module_description_t {
    let mut head = ptr::null_mut();
    for [name, shortname, longname, help] in entries.iter().rev() {
        head = Box::into_raw(Box::new(libvlc_module_description_t {
            psz_name: owned_c(name),
            psz_shortname: owned_c(shortname),
            psz_longname: owned_c(longname),
            psz_help: owned_c(help),
            p_next: head,
        }));
    }
    if !head.is_null() {
        with(|s| s.live_lists += 1);
    }
    head
}

unsafe extern "C" fn mock_audio_filter_list_get(
    _: *mut libvlc_instance_t,
) -> *mut libvlc_module_description_t {
    hit("libvlc_audio_filter_list_get");
    let entries = with(|s| s.audio_filters.clone());
    module_list(&entries)
}

unsafe extern "C" fn mock_video_filter_list_get(
    _: *mut libvlc_instance_t,
) -> *mut libvlc_module_description_t {
    hit("libvlc_video_filter_list_get");
    let entries = with(|s| s.video_filters.clone());
    module_list(&entries)
}

unsafe extern "C" fn mock_module_description_list_release(
    mut node: *mut libvlc_module_description_t,
) {
    hit("libvlc_module_description_list_release");
    while !node.is_null() {
        let boxed = unsafe { Box::from_raw(node) };
        unsafe {
            free_c(boxed.psz_name);
            free_c(boxed.psz_shortname);
            free_c(boxed.psz_longname);
            free_c(boxed.psz_help);
        }
        node = boxed.p_next;
    }
    with(|s| s.live_lists -= 1);
}

unsafe extern "C" fn mock_audio_output_list_get(
    _: *mut libvlc_instance_t,
) -> *mut libvlc_audio_output_t {
    hit("libvlc_audio_output_list_get");
    let entries = with(|s| s.audio_outputs.clone());
    let mut head = ptr::null_mut();
    for (name, description) in entries.iter().rev() {
        head = Box::into_raw(Box::new(libvlc_audio_output_t {
            psz_name: owned_c(name),
            psz_description: owned_c(description),
            p_next: head,
        }));
    }
    if !head.is_null() {
        with(|s| s.live_lists += 1);
    }
    head
}

unsafe extern "C" fn mock_audio_output_list_release(mut node: *mut libvlc_audio_output_t) {
    hit("libvlc_audio_output_list_release");
    while !node.is_null() {
        let boxed = unsafe { Box::from_raw(node) };
        unsafe {
            free_c(boxed.psz_name);
            free_c(boxed.psz_description);
        }
        node = boxed.p_next;
    }
    with(|s| s.live_lists -= 1);
}

unsafe extern "C" fn mock_device_count(_: *mut libvlc_instance_t, _: *const c_char) -> c_int {
    hit("libvlc_audio_output_device_count");
    with(|s| s.devices.len() as c_int)
}

unsafe extern "C" fn mock_device_longname(
    _: *mut libvlc_instance_t,
    _: *const c_char,
    index: c_int,
) -> *mut c_char {
    hit("libvlc_audio_output_device_longname");
    match with(|s| s.devices.get(index as usize).cloned()) {
        Some((longname, _)) => strdup(&longname),
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn mock_device_id(
    _: *mut libvlc_instance_t,
    _: *const c_char,
    index: c_int,
) -> *mut c_char {
    hit("libvlc_audio_output_device_id");
    match with(|s| s.devices.get(index as usize).cloned()) {
        Some((_, id)) => strdup(&id),
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn mock_device_list_get(
    _: *mut libvlc_instance_t,
    _: *const c_char,
) -> *mut libvlc_audio_output_device_t {
    hit("libvlc_audio_output_device_list_get");
    let entries = with(|s| s.devices.clone());
    let mut head = ptr::null_mut();
    for (longname, id) in entries.iter().rev() {
        head = Box::into_raw(Box::new(libvlc_audio_output_device_t {
            p_next: head,
            psz_device: owned_c(id),
            psz_description: owned_c(longname),
        }));
    }
    if !head.is_null() {
        with(|s| s.live_lists += 1);
    }
    head
}

unsafe extern "C" fn mock_device_list_release(mut node: *mut libvlc_audio_output_device_t) {
    hit("libvlc_audio_output_device_list_release");
    while !node.is_null() {
        let boxed = unsafe { Box::from_raw(node) };
        unsafe {
            free_c(boxed.psz_device);
            free_c(boxed.psz_description);
        }
        node = boxed.p_next;
    }
    with(|s| s.live_lists -= 1);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_event_attach(
    _: *mut libvlc_event_manager_t,
    type_: c_int,
    cb: libvlc_callback_t,
    data: *mut c_void,
) -> c_int {
    hit("libvlc_event_attach");
    with(|s| s.attached.push((type_, cb, data as usize)));
    0
}

unsafe extern "C" fn mock_event_detach(
    _: *mut libvlc_event_manager_t,
    type_: c_int,
    _: libvlc_callback_t,
    data: *mut c_void,
) {
    hit("libvlc_event_detach");
    with(|s| {
        if let Some(pos) = s
            .attached
            .iter()
            .position(|(ty, _, d)| *ty == type_ && *d == data as usize)
        {
            s.attached.remove(pos);
        }
    });
}

// ---------------------------------------------------------------------------
// Media and media lists
// ---------------------------------------------------------------------------

fn new_media(input: *const c_char) -> *mut libvlc_media_t {
    let media = constructed::<libvlc_media_t>();
    if !media.is_null() {
        let input = unsafe { read(input) };
        with(|s| s.mrls.insert(media as usize, input));
    }
    media
}

unsafe extern "C" fn mock_media_new_location(
    _: *mut libvlc_instance_t,
    mrl: *const c_char,
) -> *mut libvlc_media_t {
    hit("libvlc_media_new_location");
    new_media(mrl)
}

unsafe extern "C" fn mock_media_new_path(
    _: *mut libvlc_instance_t,
    path: *const c_char,
) -> *mut libvlc_media_t {
    hit("libvlc_media_new_path");
    new_media(path)
}

unsafe extern "C" fn mock_media_add_option(_: *mut libvlc_media_t, option: *const c_char) {
    hit("libvlc_media_add_option");
    let option = unsafe { read(option) };
    with(|s| s.options.push(option));
}

unsafe extern "C" fn mock_media_retain(_: *mut libvlc_media_t) {
    hit("libvlc_media_retain");
}

unsafe extern "C" fn mock_media_release(_: *mut libvlc_media_t) {
    hit("libvlc_media_release");
}

unsafe extern "C" fn mock_media_get_mrl(media: *mut libvlc_media_t) -> *mut c_char {
    hit("libvlc_media_get_mrl");
    match with(|s| s.mrls.get(&(media as usize)).cloned()) {
        Some(mrl) => strdup(&mrl),
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn mock_media_get_state(_: *mut libvlc_media_t) -> c_int {
    hit("libvlc_media_get_state");
    0
}

unsafe extern "C" fn mock_media_event_manager(
    media: *mut libvlc_media_t,
) -> *mut libvlc_event_manager_t {
    hit("libvlc_media_event_manager");
    manager_of(media)
}

unsafe extern "C" fn mock_media_list_new(_: *mut libvlc_instance_t) -> *mut libvlc_media_list_t {
    hit("libvlc_media_list_new");
    constructed()
}

unsafe extern "C" fn mock_media_list_retain(_: *mut libvlc_media_list_t) {
    hit("libvlc_media_list_retain");
}

unsafe extern "C" fn mock_media_list_release(_: *mut libvlc_media_list_t) {
    hit("libvlc_media_list_release");
}

unsafe extern "C" fn mock_media_list_add_media(
    list: *mut libvlc_media_list_t,
    media: *mut libvlc_media_t,
) -> c_int {
    hit("libvlc_media_list_add_media");
    with(|s| {
        s.list_additions.push(media as usize);
        *s.list_counts.entry(list as usize).or_default() += 1;
    });
    0
}

unsafe extern "C" fn mock_media_list_count(list: *mut libvlc_media_list_t) -> c_int {
    hit("libvlc_media_list_count");
    with(|s| s.list_counts.get(&(list as usize)).copied().unwrap_or(0))
}

unsafe extern "C" fn mock_media_list_lock(_: *mut libvlc_media_list_t) {
    hit("libvlc_media_list_lock");
}

unsafe extern "C" fn mock_media_list_unlock(_: *mut libvlc_media_list_t) {
    hit("libvlc_media_list_unlock");
}

unsafe extern "C" fn mock_media_list_event_manager(
    list: *mut libvlc_media_list_t,
) -> *mut libvlc_event_manager_t {
    hit("libvlc_media_list_event_manager");
    manager_of(list)
}

// ---------------------------------------------------------------------------
// Media player and rendering callbacks
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_player_new(_: *mut libvlc_instance_t) -> *mut libvlc_media_player_t {
    hit("libvlc_media_player_new");
    constructed()
}

unsafe extern "C" fn mock_player_retain(_: *mut libvlc_media_player_t) {
    hit("libvlc_media_player_retain");
}

unsafe extern "C" fn mock_player_release(_: *mut libvlc_media_player_t) {
    hit("libvlc_media_player_release");
}

unsafe extern "C" fn mock_player_set_media(_: *mut libvlc_media_player_t, _: *mut libvlc_media_t) {
    hit("libvlc_media_player_set_media");
}

unsafe extern "C" fn mock_player_play(player: *mut libvlc_media_player_t) -> c_int {
    hit("libvlc_media_player_play");
    with(|s| s.playing.insert(player as usize, true));
    0
}

unsafe extern "C" fn mock_player_pause(player: *mut libvlc_media_player_t) {
    hit("libvlc_media_player_pause");
    with(|s| s.playing.insert(player as usize, false));
}

unsafe extern "C" fn mock_player_stop(player: *mut libvlc_media_player_t) {
    hit("libvlc_media_player_stop");
    with(|s| s.playing.insert(player as usize, false));
}

unsafe extern "C" fn mock_player_is_playing(player: *mut libvlc_media_player_t) -> c_int {
    hit("libvlc_media_player_is_playing");
    with(|s| s.playing.get(&(player as usize)).copied().unwrap_or(false) as c_int)
}

unsafe extern "C" fn mock_player_event_manager(
    player: *mut libvlc_media_player_t,
) -> *mut libvlc_event_manager_t {
    hit("libvlc_media_player_event_manager");
    manager_of(player)
}

unsafe extern "C" fn mock_video_set_callbacks(
    _: *mut libvlc_media_player_t,
    lock: Option<libvlc_video_lock_cb>,
    _: Option<libvlc_video_unlock_cb>,
    _: Option<libvlc_video_display_cb>,
    opaque: *mut c_void,
) {
    hit("libvlc_video_set_callbacks");
    with(|s| s.video_lock = lock.map(|lock| (lock, opaque as usize)));
}

unsafe extern "C" fn mock_video_set_format(
    _: *mut libvlc_media_player_t,
    chroma: *const c_char,
    width: c_uint,
    height: c_uint,
    pitch: c_uint,
) {
    hit("libvlc_video_set_format");
    let chroma = unsafe { read(chroma) };
    with(|s| s.video_format = Some((chroma, width, height, pitch)));
}

unsafe extern "C" fn mock_video_set_format_callbacks(
    _: *mut libvlc_media_player_t,
    _: Option<libvlc_video_format_cb>,
    _: Option<libvlc_video_cleanup_cb>,
) {
    hit("libvlc_video_set_format_callbacks");
}

unsafe extern "C" fn mock_audio_set_callbacks(
    _: *mut libvlc_media_player_t,
    play: Option<libvlc_audio_play_cb>,
    _: Option<libvlc_audio_pause_cb>,
    _: Option<libvlc_audio_resume_cb>,
    _: Option<libvlc_audio_flush_cb>,
    _: Option<libvlc_audio_drain_cb>,
    opaque: *mut c_void,
) {
    hit("libvlc_audio_set_callbacks");
    with(|s| s.audio_play = play.map(|play| (play, opaque as usize)));
}

unsafe extern "C" fn mock_audio_set_volume_callback(
    _: *mut libvlc_media_player_t,
    _: Option<libvlc_audio_set_volume_cb>,
) {
    hit("libvlc_audio_set_volume_callback");
}

unsafe extern "C" fn mock_audio_set_format_callbacks(
    _: *mut libvlc_media_player_t,
    _: Option<libvlc_audio_setup_cb>,
    _: Option<libvlc_audio_cleanup_cb>,
) {
    hit("libvlc_audio_set_format_callbacks");
}

unsafe extern "C" fn mock_audio_set_format(
    _: *mut libvlc_media_player_t,
    _: *const c_char,
    _: c_uint,
    _: c_uint,
) {
    hit("libvlc_audio_set_format");
}

// ---------------------------------------------------------------------------
// Media list player
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_list_player_new(
    _: *mut libvlc_instance_t,
) -> *mut libvlc_media_list_player_t {
    hit("libvlc_media_list_player_new");
    constructed()
}

unsafe extern "C" fn mock_list_player_retain(_: *mut libvlc_media_list_player_t) {
    hit("libvlc_media_list_player_retain");
}

unsafe extern "C" fn mock_list_player_release(_: *mut libvlc_media_list_player_t) {
    hit("libvlc_media_list_player_release");
}

unsafe extern "C" fn mock_list_player_set_media_list(
    _: *mut libvlc_media_list_player_t,
    _: *mut libvlc_media_list_t,
) {
    hit("libvlc_media_list_player_set_media_list");
}

unsafe extern "C" fn mock_list_player_set_media_player(
    _: *mut libvlc_media_list_player_t,
    _: *mut libvlc_media_player_t,
) {
    hit("libvlc_media_list_player_set_media_player");
}

unsafe extern "C" fn mock_list_player_play(_: *mut libvlc_media_list_player_t) {
    hit("libvlc_media_list_player_play");
}

unsafe extern "C" fn mock_list_player_pause(_: *mut libvlc_media_list_player_t) {
    hit("libvlc_media_list_player_pause");
}

unsafe extern "C" fn mock_list_player_stop(_: *mut libvlc_media_list_player_t) {
    hit("libvlc_media_list_player_stop");
}

unsafe extern "C" fn mock_list_player_next(_: *mut libvlc_media_list_player_t) -> c_int {
    hit("libvlc_media_list_player_next");
    -1
}

unsafe extern "C" fn mock_list_player_event_manager(
    player: *mut libvlc_media_list_player_t,
) -> *mut libvlc_event_manager_t {
    hit("libvlc_media_list_player_event_manager");
    manager_of(player)
}

// ---------------------------------------------------------------------------
// Media discoverer
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_discoverer_new(
    _: *mut libvlc_instance_t,
    name: *const c_char,
) -> *mut libvlc_media_discoverer_t {
    hit("libvlc_media_discoverer_new");
    let name = unsafe { read(name) };
    with(|s| s.discoverer_name = Some(name));
    constructed()
}

unsafe extern "C" fn mock_discoverer_start(discoverer: *mut libvlc_media_discoverer_t) -> c_int {
    hit("libvlc_media_discoverer_start");
    with(|s| {
        if s.fail_discoverer_start {
            -1
        } else {
            s.running.insert(discoverer as usize, true);
            0
        }
    })
}

unsafe extern "C" fn mock_discoverer_stop(discoverer: *mut libvlc_media_discoverer_t) {
    hit("libvlc_media_discoverer_stop");
    with(|s| s.running.insert(discoverer as usize, false));
}

unsafe extern "C" fn mock_discoverer_release(_: *mut libvlc_media_discoverer_t) {
    hit("libvlc_media_discoverer_release");
}

unsafe extern "C" fn mock_discoverer_is_running(
    discoverer: *mut libvlc_media_discoverer_t,
) -> c_int {
    hit("libvlc_media_discoverer_is_running");
    with(|s| s.running.get(&(discoverer as usize)).copied().unwrap_or(false) as c_int)
}

unsafe extern "C" fn mock_discoverer_media_list(
    _: *mut libvlc_media_discoverer_t,
) -> *mut libvlc_media_list_t {
    hit("libvlc_media_discoverer_media_list");
    alloc()
}

// ---------------------------------------------------------------------------
// VLM
// ---------------------------------------------------------------------------

unsafe extern "C" fn mock_vlm_release(_: *mut libvlc_instance_t) {
    hit("libvlc_vlm_release");
    with(|s| s.broadcasts.clear());
}

#[allow(clippy::too_many_arguments)]
unsafe extern "C" fn mock_vlm_add_broadcast(
    _: *mut libvlc_instance_t,
    name: *const c_char,
    _: *const c_char,
    _: *const c_char,
    _: c_int,
    _: *const *const c_char,
    enabled: c_int,
    _: c_int,
) -> c_int {
    hit("libvlc_vlm_add_broadcast");
    let name = unsafe { read(name) };
    with(|s| s.broadcasts.push((name, enabled)));
    0
}

fn vlm_known(name: *const c_char) -> c_int {
    let name = unsafe { read(name) };
    if with(|s| s.broadcasts.iter().any(|(n, _)| *n == name)) {
        0
    } else {
        -1
    }
}

unsafe extern "C" fn mock_vlm_play_media(_: *mut libvlc_instance_t, name: *const c_char) -> c_int {
    hit("libvlc_vlm_play_media");
    vlm_known(name)
}

unsafe extern "C" fn mock_vlm_stop_media(_: *mut libvlc_instance_t, name: *const c_char) -> c_int {
    hit("libvlc_vlm_stop_media");
    vlm_known(name)
}

unsafe extern "C" fn mock_vlm_pause_media(_: *mut libvlc_instance_t, name: *const c_char) -> c_int {
    hit("libvlc_vlm_pause_media");
    vlm_known(name)
}

unsafe extern "C" fn mock_vlm_del_media(_: *mut libvlc_instance_t, name: *const c_char) -> c_int {
    hit("libvlc_vlm_del_media");
    let status = vlm_known(name);
    let name = unsafe { read(name) };
    with(|s| s.broadcasts.retain(|(n, _)| *n != name));
    status
}

unsafe extern "C" fn mock_vlm_get_event_manager(
    instance: *mut libvlc_instance_t,
) -> *mut libvlc_event_manager_t {
    hit("libvlc_vlm_get_event_manager");
    manager_of(instance)
}
