//! Built-in declarations for common standard library packages.
//!
//! Used when `$GOROOT` is not available so that interfaces referring to
//! `io.Reader`, `context.Context` and similar types can still be mocked.
//! Only type declarations are included.

/// Returns the source of a built-in package, if one exists for the path.
#[must_use]
pub fn builtin_source(import_path: &str) -> Option<&'static str> {
    match import_path {
        "io" => Some(IO),
        "fmt" => Some(FMT),
        "context" => Some(CONTEXT),
        "sort" => Some(SORT),
        "time" => Some(TIME),
        "errors" => Some(ERRORS),
        "net/http" => Some(NET_HTTP),
        _ => None,
    }
}

/// Returns true for the import paths that are never backed by source files.
#[must_use]
pub fn is_pseudo_package(import_path: &str) -> bool {
    matches!(import_path, "unsafe" | "C")
}

const IO: &str = r"package io

type Reader interface {
	Read(p []byte) (n int, err error)
}

type Writer interface {
	Write(p []byte) (n int, err error)
}

type Closer interface {
	Close() error
}

type Seeker interface {
	Seek(offset int64, whence int) (int64, error)
}

type ReadWriter interface {
	Reader
	Writer
}

type ReadCloser interface {
	Reader
	Closer
}

type WriteCloser interface {
	Writer
	Closer
}

type ReadWriteCloser interface {
	Reader
	Writer
	Closer
}

type ReadSeeker interface {
	Reader
	Seeker
}

type ReadSeekCloser interface {
	Reader
	Seeker
	Closer
}

type ReaderAt interface {
	ReadAt(p []byte, off int64) (n int, err error)
}

type WriterAt interface {
	WriteAt(p []byte, off int64) (n int, err error)
}

type ReaderFrom interface {
	ReadFrom(r Reader) (n int64, err error)
}

type WriterTo interface {
	WriteTo(w Writer) (n int64, err error)
}

type ByteReader interface {
	ReadByte() (byte, error)
}

type ByteWriter interface {
	WriteByte(c byte) error
}

type RuneReader interface {
	ReadRune() (r rune, size int, err error)
}

type StringWriter interface {
	WriteString(s string) (n int, err error)
}
";

const FMT: &str = r"package fmt

type Stringer interface {
	String() string
}

type GoStringer interface {
	GoString() string
}

type State interface {
	Write(b []byte) (n int, err error)
	Width() (wid int, ok bool)
	Precision() (prec int, ok bool)
	Flag(c int) bool
}

type Formatter interface {
	Format(f State, verb rune)
}
";

const CONTEXT: &str = r#"package context

import "time"

type Context interface {
	Deadline() (deadline time.Time, ok bool)
	Done() <-chan struct{}
	Err() error
	Value(key any) any
}

type CancelFunc func()

type CancelCauseFunc func(cause error)
"#;

const SORT: &str = r"package sort

type Interface interface {
	Len() int
	Less(i, j int) bool
	Swap(i, j int)
}
";

const TIME: &str = r"package time

type Duration int64

type Month int

type Weekday int

type Time struct {
	wall uint64
	ext  int64
	loc  *Location
}

type Location struct {
	name string
}

type Timer struct {
	C <-chan Time
}

type Ticker struct {
	C <-chan Time
}
";

const ERRORS: &str = r"package errors
";

const NET_HTTP: &str = r#"package http

import (
	"context"
	"io"
	"net/url"
)

type Header map[string][]string

type Cookie struct {
	Name     string
	Value    string
	Path     string
	Domain   string
	MaxAge   int
	Secure   bool
	HttpOnly bool
}

type Request struct {
	Method        string
	URL           *url.URL
	Proto         string
	Header        Header
	Body          io.ReadCloser
	ContentLength int64
	Host          string
	RemoteAddr    string
	RequestURI    string
	ctx           context.Context
}

type Response struct {
	Status        string
	StatusCode    int
	Proto         string
	Header        Header
	Body          io.ReadCloser
	ContentLength int64
	Request       *Request
}

type ResponseWriter interface {
	Header() Header
	Write([]byte) (int, error)
	WriteHeader(statusCode int)
}

type Handler interface {
	ServeHTTP(ResponseWriter, *Request)
}

type HandlerFunc func(ResponseWriter, *Request)

type RoundTripper interface {
	RoundTrip(*Request) (*Response, error)
}

type Client struct {
	Transport RoundTripper
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{go_parser, parse_source};

    #[test]
    fn test_builtin_sources_parse_cleanly() {
        let mut parser = go_parser().expect("Failed to load grammar");
        for path in ["io", "fmt", "context", "sort", "time", "errors", "net/http"] {
            let src = builtin_source(path).expect("missing builtin");
            let file = parse_source(&mut parser, path, src).expect("Failed to parse");
            assert!(file.errors.is_empty(), "{path}: {:?}", file.errors);
            assert!(!file.package.is_empty());
        }
    }

    #[test]
    fn test_unknown_and_pseudo_packages() {
        assert!(builtin_source("strings").is_none());
        assert!(is_pseudo_package("unsafe"));
        assert!(!is_pseudo_package("io"));
    }
}
